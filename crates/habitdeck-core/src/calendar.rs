//! Local-calendar day keys and month-grid arithmetic.
//!
//! Day keys are `YYYY-MM-DD` strings in the local calendar (not UTC). They are
//! both the map key for completion records and the persisted representation,
//! so the format is a contract, not a display choice.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a calendar day as its `YYYY-MM-DD` key.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` key back into a date. Returns `None` for anything
/// that does not match the zero-padded format.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()
}

/// Today's local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Today's day key from the local wall clock.
pub fn today_key() -> String {
    day_key(today())
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `delta` months away from the month containing
/// `date`. Handles year boundaries in both directions.
pub fn add_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let months = date.year() * 12 + date.month0() as i32 + delta;
    let year = months.div_euclid(12);
    let month = months.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_else(|| month_start(date))
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let next = add_months(date, 1);
    next.pred_opt().map(|d| d.day()).unwrap_or(28)
}

/// One cell of a rendered month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayCell {
    /// Placeholder before the 1st or after the last day, keeping rows at 7.
    Pad,
    /// A real date outside the selectable range (before the task existed or
    /// in the future). Rendered empty and disabled.
    OutOfRange { date: NaiveDate },
    /// A selectable date carrying its key and completion state.
    Day {
        date: NaiveDate,
        key: String,
        completed: bool,
    },
}

/// Sunday-first dates of the month containing `month`, padded with `None`
/// before the 1st and after the last day so the length is a multiple of 7.
pub fn month_cells(month: NaiveDate) -> Vec<Option<NaiveDate>> {
    let first = month_start(month);
    let offset = first.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(first);

    let mut cells: Vec<Option<NaiveDate>> = Vec::with_capacity(42);
    cells.resize(offset, None);
    for day in 1..=days {
        cells.push(NaiveDate::from_ymd_opt(first.year(), first.month(), day));
    }
    while cells.len() % 7 != 0 {
        cells.push(None);
    }
    cells
}

/// Clamp a month to the inclusive `[min, max]` navigation range.
/// Inputs are first-of-month dates.
pub fn clamp_month(month: NaiveDate, min: NaiveDate, max: NaiveDate) -> NaiveDate {
    if month < min {
        min
    } else if month > max {
        max
    } else {
        month
    }
}
