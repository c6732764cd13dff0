//! Calendar value types: months, times of day and weekday numbering.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{ClubSchedError, Result};

/// A calendar month, the unit of event generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "YearMonthRepr", into = "YearMonthRepr")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Serialize, Deserialize)]
struct YearMonthRepr {
    year: i32,
    month: u32,
}

impl TryFrom<YearMonthRepr> for YearMonth {
    type Error = ClubSchedError;

    fn try_from(value: YearMonthRepr) -> Result<Self> {
        Self::new(value.year, value.month)
    }
}

impl From<YearMonth> for YearMonthRepr {
    fn from(value: YearMonth) -> Self {
        Self { year: value.year, month: value.month }
    }
}

impl YearMonth {
    /// Create a month, rejecting `month` outside `1..=12` and years chrono
    /// cannot represent.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ClubSchedError::InvalidInput(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        // Both ends of the month must be representable.
        let next_year = if month == 12 { year.checked_add(1) } else { Some(year) };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and(next_year.and_then(|y| NaiveDate::from_ymd_opt(y, month % 12 + 1, 1)))
            .ok_or_else(|| ClubSchedError::InvalidInput(format!("year {year} is out of range")))?;
        Ok(Self { year, month })
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    /// Actual number of days in the month (28 to 31).
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The following month, rolling over the year after December.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// `count` consecutive months starting with `self`.
    pub fn successors(self, count: u32) -> Vec<Self> {
        std::iter::successors(Some(self), |m| Some(m.next())).take(count as usize).collect()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ClubSchedError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ClubSchedError::InvalidInput(format!("expected YYYY-MM, got {s:?}"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

/// Local time of day, written as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parse strictly two-digit hours and minutes separated by a colon.
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && bytes.iter().enumerate().all(|(i, b)| i == 2 || b.is_ascii_digit());
        if !well_formed {
            return Err(format!("expected HH:MM, got {s:?}"));
        }
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|e| format!("invalid time {s:?}: {e}"))
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Weekday for a `0..=6` index where 0 is Sunday.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// `0..=6` index of a weekday where 0 is Sunday.
pub fn weekday_index(weekday: Weekday) -> u8 {
    // num_days_from_sunday is always in 0..=6
    weekday.num_days_from_sunday() as u8
}
