//! Calendar helpers for the scan horizon.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// A month counts as 30 days when computing the scan horizon.
const DAYS_PER_MONTH: u64 = 30;

fn horizon_end(from: NaiveDate, months_ahead: u32) -> NaiveDate {
    from + Days::new(u64::from(months_ahead) * DAYS_PER_MONTH)
}

fn is_weekend_day(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Fri | Weekday::Sat | Weekday::Sun)
}

/// Returns every Friday, Saturday and Sunday between `from` and the end of
/// the horizon, inclusive, in ascending order.
pub fn weekend_days(from: NaiveDate, months_ahead: u32) -> Vec<NaiveDate> {
    let end = horizon_end(from, months_ahead);
    from.iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_weekend_day(d.weekday()))
        .collect()
}

/// Returns the (year, month) pairs the horizon touches, in order.
pub fn months_in_horizon(from: NaiveDate, months_ahead: u32) -> Vec<(i32, u32)> {
    let end = horizon_end(from, months_ahead);
    let mut months = Vec::new();
    let (mut year, mut month) = (from.year(), from.month());

    loop {
        months.push((year, month));
        if (year, month) == (end.year(), end.month()) {
            break;
        }
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }

    months
}

/// Returns the first Friday on or after `from`.
pub fn next_friday(from: NaiveDate) -> NaiveDate {
    let offset = (Weekday::Fri.num_days_from_monday() + 7
        - from.weekday().num_days_from_monday())
        % 7;
    from + Days::new(u64::from(offset))
}
