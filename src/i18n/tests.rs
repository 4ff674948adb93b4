use super::*;
use chrono::NaiveDate;
use sprout_core::entities::{Group, Plant};
use sprout_core::watering::start_of_day;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_all_keys_resolve() {
    let keys = [
        "welcome",
        "main_menu",
        "help",
        "cancelled",
        "something_wrong",
        "stale_button",
        "use_buttons",
        "use_menu",
        "photo_not_expected",
        "empty_title",
        "title_too_long",
        "future_date",
        "ask_group_title",
        "ask_group_description",
        "ask_last_watering_date",
        "ask_watering_interval",
        "group_exists",
        "no_groups",
        "choose_group",
        "ask_new_group_title",
        "ask_new_group_description",
        "ask_new_last_watering_date",
        "ask_new_watering_interval",
        "need_group_first",
        "ask_plant_title",
        "ask_plant_description",
        "ask_plant_group",
        "ask_plant_photo_question",
        "ask_plant_photo",
        "plant_exists",
        "no_plants",
        "choose_plant",
        "ask_new_plant_title",
        "ask_new_plant_description",
        "ask_new_plant_group",
        "ask_new_plant_photo",
        "no_plants_in_group",
        "btn_watered",
    ];
    for key in keys {
        assert_ne!(t(key), "???", "missing label for {key}");
    }
    assert_eq!(t("no_such_key"), "???");
}

#[test]
fn test_interval_plural_forms() {
    assert_eq!(interval(1), "каждый день");
    assert_eq!(interval(2), "каждые 2 дня");
    assert_eq!(interval(4), "каждые 4 дня");
    assert_eq!(interval(5), "каждые 5 дней");
    assert_eq!(interval(7), "каждые 7 дней");
    assert_eq!(interval(11), "каждые 11 дней");
    assert_eq!(interval(12), "каждые 12 дней");
    assert_eq!(interval(14), "каждые 14 дней");
    assert_eq!(interval(21), "каждый 21 день");
    assert_eq!(interval(22), "каждые 22 дня");
    assert_eq!(interval(30), "каждые 30 дней");
}

#[test]
fn test_date_format() {
    assert_eq!(date(start_of_day(day(2024, 6, 1))), "01.06.2024");
}

#[test]
fn test_month_title() {
    assert_eq!(month_title(day(2024, 6, 1)), "Июнь 2024");
    assert_eq!(month_title(day(2025, 1, 31)), "Январь 2025");
}

#[test]
fn test_plant_list_numbered() {
    let plants = vec![
        Plant {
            title: "Фикус".into(),
            ..Default::default()
        },
        Plant {
            title: "Монстера".into(),
            ..Default::default()
        },
    ];
    assert_eq!(plant_list(&plants), "1) Фикус\n2) Монстера");
}

#[test]
fn test_notification_contains_all_parts() {
    let group = Group {
        title: "Цветы".into(),
        description: "Комнатные".into(),
        last_watering_date: start_of_day(day(2024, 5, 25)),
        watering_interval: 7,
        ..Default::default()
    };
    let text = notification(&group, &[]);
    assert!(text.contains("Цветы"));
    assert!(text.contains("Комнатные"));
    assert!(text.contains("25.05.2024"));
    assert!(text.contains("каждые 7 дней"));
    assert!(text.contains(t("no_plants_in_group")));
}

#[test]
fn test_confirm_delete_group_mentions_plants() {
    let group = Group {
        title: "Цветы".into(),
        ..Default::default()
    };
    assert!(!confirm_delete_group(&group, 0).contains("растения"));
    assert!(confirm_delete_group(&group, 3).contains("3"));
}
