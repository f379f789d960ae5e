//! Calendar helpers at day granularity.
//!
//! All dates in the engine are `NaiveDate`: a local calendar day, already
//! normalized to local midnight by whoever produced it.

use chrono::{Datelike, Days, NaiveDate};

/// Signed number of whole days from `from` to `to`.
pub fn whole_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Weekday number with 1 = Sunday … 7 = Saturday.
pub fn weekday_number(date: NaiveDate) -> u8 {
    // number_from_sunday is always within 1..=7
    date.weekday().number_from_sunday() as u8
}

/// `date` shifted by `days` (negative goes back). `None` on calendar overflow.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let delta = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(delta)
    } else {
        date.checked_sub_days(delta)
    }
}

/// (year, month) following the given one.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// (year, month) preceding the given one.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn whole_days_is_signed() {
        assert_eq!(whole_days_between(date(2026, 10, 1), date(2026, 10, 4)), 3);
        assert_eq!(whole_days_between(date(2026, 10, 4), date(2026, 10, 1)), -3);
        assert_eq!(whole_days_between(date(2024, 2, 28), date(2024, 3, 1)), 2);
    }

    #[test]
    fn weekday_number_starts_on_sunday() {
        // 2026-10-18 is a Sunday
        assert_eq!(weekday_number(date(2026, 10, 18)), 1);
        assert_eq!(weekday_number(date(2026, 10, 19)), 2);
        assert_eq!(weekday_number(date(2026, 10, 24)), 7);
    }

    #[test]
    fn add_days_goes_both_ways() {
        assert_eq!(add_days(date(2026, 12, 30), 3), Some(date(2027, 1, 2)));
        assert_eq!(add_days(date(2026, 3, 1), -1), Some(date(2026, 2, 28)));
    }

    #[test]
    fn month_stepping_wraps_years() {
        assert_eq!(next_month(2026, 12), (2027, 1));
        assert_eq!(previous_month(2027, 1), (2026, 12));
    }
}
