//! Date helpers.
//!
//! Two kinds of comparison are used and must not be mixed up: calendar-day
//! equality ([`same_day`], [`on_date`]) for grid cells and relative labels,
//! and timestamp ordering ([`is_before`]) for overdue checks.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};

/// True when both timestamps fall on the same calendar day.
pub fn same_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}

/// True when `ts` falls on `date`.
pub fn on_date(ts: NaiveDateTime, date: NaiveDate) -> bool {
    ts.date() == date
}

/// Strict timestamp ordering, time of day included.
pub fn is_before(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a < b
}

/// Label a date relative to `now`: `Today`, `Tomorrow`, `Yesterday`, or a
/// short month and day such as `Mar 5`.
pub fn format_relative(date: NaiveDateTime, now: NaiveDateTime) -> String {
    let day = date.date();
    let today = now.date();

    if day == today {
        "Today".to_string()
    } else if today.succ_opt() == Some(day) {
        "Tomorrow".to_string()
    } else if today.pred_opt() == Some(day) {
        "Yesterday".to_string()
    } else {
        day.format("%b %-d").to_string()
    }
}

/// Number of days in a zero-based month: the day before the first of the next month.
pub fn days_in_month(year: i32, month0: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    next.pred_opt().map(|last| last.day())
}

/// Weekday of the first day of a zero-based month, 0 = Sunday.
pub fn first_weekday(year: i32, month0: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).map(|d| d.weekday().num_days_from_sunday())
}

/// Move a timestamp by whole months, clamping the day to the target month's
/// length. Out-of-range results leave the timestamp unchanged.
pub fn shift_months(ts: NaiveDateTime, delta: i32) -> NaiveDateTime {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        ts.checked_add_months(months)
    } else {
        ts.checked_sub_months(months)
    };
    shifted.unwrap_or(ts)
}

pub fn month_name(month0: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    NAMES.get(month0 as usize).copied().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn relative_labels_compare_calendar_days_not_hours() {
        let now = at("2024-03-14", "23:30");
        assert_eq!(format_relative(at("2024-03-14", "00:01"), now), "Today");
        assert_eq!(format_relative(at("2024-03-15", "00:10"), now), "Tomorrow");
        assert_eq!(format_relative(at("2024-03-13", "23:59"), now), "Yesterday");
    }

    #[test]
    fn relative_label_falls_back_to_short_month_day() {
        let now = at("2024-03-01", "09:00");
        assert_eq!(format_relative(now + Duration::days(14), now), "Mar 15");
        assert_eq!(format_relative(at("2024-12-05", "09:00"), now), "Dec 5");
    }

    #[test]
    fn relative_label_crosses_month_boundaries() {
        let now = at("2024-02-29", "12:00");
        assert_eq!(format_relative(at("2024-03-01", "08:00"), now), "Tomorrow");
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 1), Some(29));
        assert_eq!(days_in_month(2023, 1), Some(28));
        assert_eq!(days_in_month(2024, 11), Some(31));
        assert_eq!(days_in_month(2024, 12), None);
    }

    #[test]
    fn first_weekday_counts_from_sunday() {
        // 1 March 2024 was a Friday.
        assert_eq!(first_weekday(2024, 2), Some(5));
        // 1 September 2024 was a Sunday.
        assert_eq!(first_weekday(2024, 8), Some(0));
    }

    #[test]
    fn shift_months_clamps_day_of_month() {
        let jan31 = at("2024-01-31", "10:00");
        assert_eq!(shift_months(jan31, 1), at("2024-02-29", "10:00"));
        assert_eq!(shift_months(jan31, -2), at("2023-11-30", "10:00"));
        assert_eq!(shift_months(jan31, 0), jan31);
    }

    #[test]
    fn same_day_and_is_before_disagree_within_a_day() {
        let morning = at("2024-03-15", "08:00");
        let evening = at("2024-03-15", "20:00");
        assert!(same_day(morning, evening));
        assert!(is_before(morning, evening));
    }
}
