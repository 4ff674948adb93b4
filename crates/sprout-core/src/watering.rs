//! The next-watering-date rule shared by the wizard, use-cases and scheduler.
//!
//! All watering instants are local wall-clock times without a zone; the
//! scheduler compares them against `chrono::Local::now()`.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::SproutError;

/// The longest watering interval accepted, in days.
pub const MAX_WATERING_INTERVAL: i64 = 365;

/// Whether `days` is an acceptable watering interval.
pub fn is_valid_interval(days: i64) -> bool {
    (1..=MAX_WATERING_INTERVAL).contains(&days)
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Midnight at the start of today, local time.
pub fn start_of_today() -> NaiveDateTime {
    start_of_day(today())
}

/// `max(start of today, last + interval days)`.
///
/// A sum outside the representable calendar is `InvalidInput`.
pub fn next_watering_date(
    last_watering: NaiveDateTime,
    interval_days: i64,
    today: NaiveDate,
) -> Result<NaiveDateTime, SproutError> {
    let next = Duration::try_days(interval_days)
        .and_then(|interval| last_watering.checked_add_signed(interval))
        .ok_or_else(|| {
            SproutError::InvalidInput(format!(
                "watering interval of {interval_days} days is out of range"
            ))
        })?;
    Ok(next.max(start_of_day(today)))
}
