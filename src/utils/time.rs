use chrono::{Datelike, NaiveDate};

/// This is the standard way of converting a date to a string in time-flies.
pub fn format_week_date(date: NaiveDate) -> String {
    date.format("%b %d %Y").to_string()
}

/// Day number of the zero instant (0001-01-01) as counted by [NaiveDate::num_days_from_ce].
const ZERO_INSTANT_DAY: i32 = 1;

/// Rounds a date down to a multiple of `window_days` counted from the zero instant.
/// This is a fixed-length approximation: a 30 day window is not a calendar month.
pub fn truncate_to_window(date: NaiveDate, window_days: i32) -> NaiveDate {
    let days = date.num_days_from_ce() - ZERO_INSTANT_DAY;
    let truncated = days.div_euclid(window_days) * window_days;
    NaiveDate::from_num_days_from_ce_opt(truncated + ZERO_INSTANT_DAY)
        .expect("Truncated date never precedes the zero instant")
}
