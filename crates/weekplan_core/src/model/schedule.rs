//! Calendar arithmetic for planning years.
//!
//! Week `n` of year `Y` starts on the first Monday of `Y` plus `7 * (n - 1)`
//! days and spans seven consecutive days.

use crate::model::week::WeekId;
use chrono::{Datelike, Duration, NaiveDate};

const RANGE_DATE_FORMAT: &str = "%b %-d";

/// Returns the first Monday on or after January 1st of `year`.
///
/// Returns `None` when `year` is outside the supported calendar range.
pub fn first_monday(year: i32) -> Option<NaiveDate> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let offset = (7 - jan_first.weekday().num_days_from_monday()) % 7;
    jan_first.checked_add_signed(Duration::days(i64::from(offset)))
}

/// Returns the Monday that starts week `week_id` of `year`.
pub fn week_start(year: i32, week_id: WeekId) -> Option<NaiveDate> {
    if week_id == 0 {
        return None;
    }
    let weeks_after_first = i64::from(week_id - 1);
    first_monday(year)?.checked_add_signed(Duration::days(weeks_after_first * 7))
}

/// Formats a seven-day span starting at `start`, e.g. `"Jan 5 - Jan 11"`.
pub fn format_date_range(start: NaiveDate) -> String {
    let end = start
        .checked_add_signed(Duration::days(6))
        .unwrap_or(start);
    format!(
        "{} - {}",
        start.format(RANGE_DATE_FORMAT),
        end.format(RANGE_DATE_FORMAT)
    )
}

/// Display range for week `week_id` of `year`; empty when undefined.
pub fn week_date_range(year: i32, week_id: WeekId) -> String {
    week_start(year, week_id)
        .map(format_date_range)
        .unwrap_or_default()
}
