//! Format helpers for strings with interpolation.

use super::t;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use sprout_core::entities::{Group, Plant};

const MONTHS: [&str; 12] = [
    "Январь",
    "Февраль",
    "Март",
    "Апрель",
    "Май",
    "Июнь",
    "Июль",
    "Август",
    "Сентябрь",
    "Октябрь",
    "Ноябрь",
    "Декабрь",
];

/// Short weekday names, Monday first.
pub const WEEKDAYS: [&str; 7] = ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"];

/// `dd.mm.yyyy`.
pub fn date(value: NaiveDateTime) -> String {
    value.format("%d.%m.%Y").to_string()
}

/// Calendar header, e.g. "Июнь 2024".
pub fn month_title(month: NaiveDate) -> String {
    let name = MONTHS[month.month0() as usize];
    format!("{name} {}", month.year())
}

/// Human-readable cadence: "каждый день", "каждые 3 дня", "каждые 7 дней".
pub fn interval(days: i64) -> String {
    let n = days.abs();
    if n == 1 {
        return "каждый день".to_string();
    }
    match (n % 10, n % 100) {
        (1, r) if r != 11 => format!("каждый {days} день"),
        (2..=4, r) if !(12..=14).contains(&r) => format!("каждые {days} дня"),
        _ => format!("каждые {days} дней"),
    }
}

/// Numbered plant list, or the "no plants" line.
pub fn plant_list(plants: &[Plant]) -> String {
    if plants.is_empty() {
        return t("no_plants_in_group").to_string();
    }
    plants
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}) {}", i + 1, p.title))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The watering reminder sent by the scheduler.
pub fn notification(group: &Group, plants: &[Plant]) -> String {
    format!(
        "💧 Пора полить растения!\n\n\
         Сценарий: {}\n\
         {}\n\n\
         Последний полив: {}\n\
         Поливать {}\n\n\
         Растения:\n{}",
        group.title,
        group.description,
        date(group.last_watering_date),
        interval(group.watering_interval),
        plant_list(plants),
    )
}

fn group_details(group: &Group) -> String {
    format!(
        "Название: {}\n\
         Описание: {}\n\
         Последний полив: {}\n\
         Интервал: {}\n\
         Следующий полив: {}",
        group.title,
        group.description,
        date(group.last_watering_date),
        interval(group.watering_interval),
        date(group.next_watering_date),
    )
}

/// Card shown while managing an existing scenario.
pub fn group_card(group: &Group) -> String {
    format!("💧 Сценарий полива\n\n{}", group_details(group))
}

/// Summary shown before the scenario is created.
pub fn group_summary(group: &Group) -> String {
    format!("Проверьте сценарий:\n\n{}", group_details(group))
}

pub fn group_created(title: &str) -> String {
    format!("Сценарий «{title}» создан ✅")
}

pub fn group_deleted(title: &str) -> String {
    format!("Сценарий «{title}» удалён.")
}

pub fn confirm_delete_group(group: &Group, plants: i64) -> String {
    if plants == 0 {
        format!("Удалить сценарий «{}»?", group.title)
    } else {
        format!(
            "Удалить сценарий «{}»? Вместе с ним будут удалены растения: {plants}.",
            group.title
        )
    }
}

fn plant_details(plant: &Plant, group_title: &str) -> String {
    let photo = if plant.has_photo() { "есть" } else { "нет" };
    format!(
        "Название: {}\n\
         Описание: {}\n\
         Сценарий: {group_title}\n\
         Фото: {photo}",
        plant.title, plant.description,
    )
}

/// Card shown while managing an existing plant.
pub fn plant_card(plant: &Plant, group_title: &str) -> String {
    format!("🪴 Растение\n\n{}", plant_details(plant, group_title))
}

/// Summary shown before the plant is created.
pub fn plant_summary(plant: &Plant, group_title: &str) -> String {
    format!("Проверьте растение:\n\n{}", plant_details(plant, group_title))
}

pub fn plant_created(title: &str) -> String {
    format!("Растение «{title}» добавлено ✅")
}

pub fn plant_deleted(title: &str) -> String {
    format!("Растение «{title}» удалено.")
}

pub fn confirm_delete_plant(plant: &Plant) -> String {
    format!("Удалить растение «{}»?", plant.title)
}

/// Acknowledgement of the "watered" button.
pub fn watered(group: &Group) -> String {
    format!(
        "Отлично! Полив сценария «{}» отмечен. Следующий полив: {}.",
        group.title,
        date(group.next_watering_date),
    )
}
