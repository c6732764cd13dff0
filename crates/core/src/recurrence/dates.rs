//! Calendar arithmetic for expanding patterns into dates.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use clubsched_domain::constants::DAYS_PER_WEEK;
use clubsched_domain::{Recurrence, RecurrencePattern, YearMonth};

/// First date on or after `from` that falls on `weekday`.
pub fn next_weekday_on_or_after(from: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let offset = (7 + weekday.num_days_from_monday() - from.weekday().num_days_from_monday()) % 7;
    from.checked_add_signed(Duration::days(i64::from(offset)))
}

/// The `nth` (1-based) occurrence of `weekday` in `month`, if the month has one.
pub fn nth_weekday_of_month(month: YearMonth, weekday: Weekday, nth: u8) -> Option<NaiveDate> {
    if nth == 0 {
        return None;
    }
    let first = next_weekday_on_or_after(month.first_day(), weekday)?;
    let date = first.checked_add_signed(Duration::days(i64::from(nth - 1) * DAYS_PER_WEEK))?;
    month.contains(date).then_some(date)
}

/// Every date in `[start, end]` that falls on `weekday`, ascending.
pub fn weekdays_between(start: NaiveDate, end: NaiveDate, weekday: Weekday) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut cursor = next_weekday_on_or_after(start, weekday);
    while let Some(date) = cursor.filter(|d| *d <= end) {
        dates.push(date);
        cursor = date.checked_add_signed(Duration::days(DAYS_PER_WEEK));
    }
    dates
}

/// Candidate dates of `pattern` in `month`, ascending.
///
/// The range is the month intersected with the pattern's validity window;
/// both ends are inclusive. Holidays are not considered here.
pub fn expand_dates(pattern: &RecurrencePattern, month: YearMonth) -> Vec<NaiveDate> {
    let start = month.first_day().max(pattern.valid_from());
    let end = match pattern.valid_until() {
        Some(until) => month.last_day().min(until),
        None => month.last_day(),
    };
    if start > end {
        return Vec::new();
    }

    match pattern.recurrence() {
        Recurrence::Weekly { weekday } => weekdays_between(start, end, weekday),
        Recurrence::Monthly { weekday, week_of_month } => {
            nth_weekday_of_month(month, weekday, week_of_month)
                .filter(|date| (start..=end).contains(date))
                .into_iter()
                .collect()
        }
    }
}
