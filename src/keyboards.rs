//! Inline keyboards attached to bot replies.

use crate::callback::{Callback, GroupAction, PlantAction};
use crate::i18n::{self, t};
use chrono::{Datelike, Duration, Months, NaiveDate};
use sprout_core::entities::{Group, Plant};
use sprout_core::message::{InlineButton, InlineKeyboard};

/// Intervals offered by the picker, in days.
pub const INTERVALS: [i64; 16] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 21, 30];

const INTERVALS_PER_ROW: usize = 4;

/// The calendar does not page back past January of this year.
pub const FIRST_CALENDAR_YEAR: i32 = 1900;

fn button(text: impl Into<String>, callback: Callback) -> InlineButton {
    InlineButton::new(text, callback.encode())
}

fn noop(text: &str) -> InlineButton {
    button(text, Callback::Noop)
}

fn cancel_row() -> Vec<InlineButton> {
    vec![button(t("btn_cancel"), Callback::Cancel)]
}

pub fn main_menu() -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![
            button(t("btn_new_group"), Callback::GroupAdd),
            button(t("btn_groups"), Callback::GroupList),
        ],
        vec![
            button(t("btn_new_plant"), Callback::PlantAdd),
            button(t("btn_plants"), Callback::PlantList),
        ],
    ])
}

pub fn cancel() -> InlineKeyboard {
    InlineKeyboard::new(vec![cancel_row()])
}

pub fn confirm() -> InlineKeyboard {
    InlineKeyboard::new(vec![vec![
        button(t("btn_confirm"), Callback::Confirm),
        button(t("btn_cancel"), Callback::Cancel),
    ]])
}

/// Offer to create the first scenario.
pub fn no_groups() -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![button(t("btn_new_group"), Callback::GroupAdd)],
        vec![button(t("btn_menu"), Callback::Menu)],
    ])
}

/// Offer to create the first plant.
pub fn no_plants() -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![button(t("btn_new_plant"), Callback::PlantAdd)],
        vec![button(t("btn_menu"), Callback::Menu)],
    ])
}

pub fn photo_question() -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![
            button(t("btn_yes"), Callback::Photo(true)),
            button(t("btn_no"), Callback::Photo(false)),
        ],
        cancel_row(),
    ])
}

pub fn intervals() -> InlineKeyboard {
    let mut rows: Vec<Vec<InlineButton>> = INTERVALS
        .chunks(INTERVALS_PER_ROW)
        .map(|chunk| {
            chunk
                .iter()
                .map(|&n| button(n.to_string(), Callback::Interval(n)))
                .collect()
        })
        .collect();
    rows.push(cancel_row());
    InlineKeyboard::new(rows)
}

/// One scenario per row.
pub fn groups(groups: &[Group]) -> InlineKeyboard {
    let mut rows: Vec<Vec<InlineButton>> = groups
        .iter()
        .map(|g| vec![button(g.title.clone(), Callback::Group(g.id))])
        .collect();
    rows.push(cancel_row());
    InlineKeyboard::new(rows)
}

/// One plant per row.
pub fn plants(plants: &[Plant]) -> InlineKeyboard {
    let mut rows: Vec<Vec<InlineButton>> = plants
        .iter()
        .map(|p| vec![button(p.title.clone(), Callback::Plant(p.id))])
        .collect();
    rows.push(cancel_row());
    InlineKeyboard::new(rows)
}

pub fn group_actions() -> InlineKeyboard {
    let action = |key: &str, a: GroupAction| button(t(key), Callback::GroupAction(a));
    InlineKeyboard::new(vec![
        vec![
            action("btn_title", GroupAction::Title),
            action("btn_description", GroupAction::Description),
        ],
        vec![
            action("btn_last_watering", GroupAction::LastWatering),
            action("btn_interval", GroupAction::Interval),
        ],
        vec![action("btn_delete", GroupAction::Delete)],
        vec![button(t("btn_menu"), Callback::Menu)],
    ])
}

pub fn plant_actions() -> InlineKeyboard {
    let action = |key: &str, a: PlantAction| button(t(key), Callback::PlantAction(a));
    InlineKeyboard::new(vec![
        vec![
            action("btn_title", PlantAction::Title),
            action("btn_description", PlantAction::Description),
        ],
        vec![
            action("btn_group", PlantAction::Group),
            action("btn_photo", PlantAction::Photo),
        ],
        vec![action("btn_delete", PlantAction::Delete)],
        vec![button(t("btn_menu"), Callback::Menu)],
    ])
}

/// The single button under a watering reminder.
pub fn watered(group_id: i64) -> InlineKeyboard {
    InlineKeyboard::new(vec![vec![button(
        t("btn_watered"),
        Callback::Watered(group_id),
    )]])
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn prev_month(month: NaiveDate) -> Option<NaiveDate> {
    first_of_month(month).pred_opt().map(first_of_month)
}

pub fn next_month(month: NaiveDate) -> Option<NaiveDate> {
    first_of_month(month).checked_add_months(Months::new(1))
}

/// `month` moved into the range the calendar shows: from January of
/// [`FIRST_CALENDAR_YEAR`] to the month of `today`.
pub fn calendar_month(month: NaiveDate, today: NaiveDate) -> NaiveDate {
    let floor = NaiveDate::from_ymd_opt(FIRST_CALENDAR_YEAR, 1, 1).unwrap_or(NaiveDate::MIN);
    first_of_month(month).min(first_of_month(today)).max(floor)
}

/// A month grid, Monday first. Days after `today` are shown but not
/// selectable, and there is no navigation past the current month.
pub fn calendar(month: NaiveDate, today: NaiveDate) -> InlineKeyboard {
    let first = calendar_month(month, today);
    let this_month = first_of_month(today);

    let prev = match prev_month(first) {
        Some(prev) if prev.year() >= FIRST_CALENDAR_YEAR => {
            button("«", Callback::Calendar(prev))
        }
        _ => noop(" "),
    };
    let next = match next_month(first) {
        Some(next) if first < this_month => button("»", Callback::Calendar(next)),
        _ => noop(" "),
    };
    let mut rows = vec![
        vec![prev, noop(&i18n::month_title(first)), next],
        i18n::WEEKDAYS.iter().map(|d| noop(d)).collect(),
    ];

    let days_in_month = next_month(first).map_or(31, |next| (next - first).num_days());
    let lead = first.weekday().num_days_from_monday() as i64;
    let mut week: Vec<InlineButton> = (0..lead).map(|_| noop(" ")).collect();

    for offset in 0..days_in_month {
        let day = first + Duration::days(offset);
        let cell = if day > today {
            noop("·")
        } else {
            button(day.day().to_string(), Callback::Date(day))
        };
        week.push(cell);
        if week.len() == 7 {
            rows.push(std::mem::take(&mut week));
        }
    }
    if !week.is_empty() {
        while week.len() < 7 {
            week.push(noop(" "));
        }
        rows.push(week);
    }

    rows.push(cancel_row());
    InlineKeyboard::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn data(kb: &InlineKeyboard) -> Vec<String> {
        kb.buttons().map(|b| b.data.clone()).collect()
    }

    #[test]
    fn test_month_arithmetic() {
        assert_eq!(prev_month(day(2024, 1, 15)), Some(day(2023, 12, 1)));
        assert_eq!(next_month(day(2024, 1, 31)), Some(day(2024, 2, 1)));
        assert_eq!(next_month(day(2024, 12, 1)), Some(day(2025, 1, 1)));
        assert_eq!(prev_month(NaiveDate::MIN), None);
        assert_eq!(next_month(NaiveDate::MAX), None);
    }

    #[test]
    fn test_calendar_clamps_extreme_months() {
        let today = day(2024, 6, 10);
        assert_eq!(calendar_month(NaiveDate::MIN, today), day(1900, 1, 1));
        assert_eq!(calendar_month(NaiveDate::MAX, today), day(2024, 6, 1));

        let kb = calendar(NaiveDate::MIN, today);
        assert_eq!(kb.rows[0][0].data, "noop");
        assert_eq!(kb.rows[0][2].data, "cal:1900-02");
        assert!(data(&kb).contains(&"date:1900-01-31".to_string()));

        let kb = calendar(NaiveDate::MAX, today);
        assert_eq!(kb.rows[0][0].data, "cal:2024-05");
        assert_eq!(kb.rows[0][2].data, "noop");
    }

    #[test]
    fn test_calendar_past_month_has_every_day() {
        // June 2024 starts on a Saturday.
        let kb = calendar(day(2024, 6, 1), day(2024, 8, 10));
        let d = data(&kb);
        assert!(d.contains(&"date:2024-06-01".to_string()));
        assert!(d.contains(&"date:2024-06-30".to_string()));
        assert_eq!(d.iter().filter(|s| s.starts_with("date:")).count(), 30);
        assert_eq!(kb.rows[0][0].data, "cal:2024-05");
        assert_eq!(kb.rows[0][2].data, "cal:2024-07");
        // Header, weekdays, five weeks, cancel.
        assert_eq!(kb.rows.len(), 2 + 5 + 1);
        assert!(kb.rows[2..kb.rows.len() - 1].iter().all(|r| r.len() == 7));
    }

    #[test]
    fn test_calendar_current_month_hides_future_and_next() {
        let kb = calendar(day(2024, 6, 1), day(2024, 6, 10));
        let d = data(&kb);
        assert!(d.contains(&"date:2024-06-10".to_string()));
        assert!(!d.contains(&"date:2024-06-11".to_string()));
        assert_eq!(kb.rows[0][2].data, "noop");
    }

    #[test]
    fn test_intervals_keyboard() {
        let kb = intervals();
        let d = data(&kb);
        for n in INTERVALS {
            assert!(d.contains(&format!("interval:{n}")));
        }
        assert_eq!(d.last().map(String::as_str), Some("cancel"));
    }

    #[test]
    fn test_watered_button() {
        let kb = watered(12);
        assert_eq!(kb.rows.len(), 1);
        assert_eq!(kb.rows[0][0].text, "Растения в данном сценарии политы ✅");
        assert_eq!(kb.rows[0][0].data, "watered:12");
    }

    #[test]
    fn test_group_picker_lists_every_group() {
        let groups = vec![
            Group {
                id: 3,
                title: "Цветы".into(),
                ..Default::default()
            },
            Group {
                id: 9,
                title: "Кактусы".into(),
                ..Default::default()
            },
        ];
        let d = data(&super::groups(&groups));
        assert_eq!(d, vec!["group:3", "group:9", "cancel"]);
    }
}
