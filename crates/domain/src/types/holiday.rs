//! Public holiday tables.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::FetchFailure;
use crate::impl_domain_status_conversions;

/// A single public holiday.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self { date, name: name.into() }
    }
}

/// All public holidays of one calendar year, with cache bookkeeping.
///
/// Built wholesale from a fetch and never partially updated; a refresh
/// replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidaySet {
    year: i32,
    dates: BTreeMap<NaiveDate, String>,
    fetched_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl HolidaySet {
    /// Build a set for `year`. Holidays dated in another year are dropped.
    pub fn new(
        year: i32,
        holidays: impl IntoIterator<Item = Holiday>,
        fetched_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let dates = holidays
            .into_iter()
            .filter(|h| h.date.year() == year)
            .map(|h| (h.date, h.name))
            .collect();
        Self { year, dates, fetched_at, expires_at }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains_key(&date)
    }

    /// Name of the holiday on `date`, if any.
    pub fn name_of(&self, date: NaiveDate) -> Option<&str> {
        self.dates.get(&date).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Holidays in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &str)> + '_ {
        self.dates.iter().map(|(date, name)| (*date, name.as_str()))
    }
}

/// How an unknown holiday status (source down, nothing cached) is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayFallback {
    /// Produce nothing for the affected pattern and report it, so the month
    /// can be regenerated once the source is back.
    #[default]
    Defer,
    /// Treat unknown dates as ordinary days ("not a holiday").
    FailOpen,
    /// Treat unknown dates as holidays, i.e. skip them.
    FailClosed,
}

impl_domain_status_conversions!(HolidayFallback {
    Defer => "defer",
    FailOpen => "fail_open",
    FailClosed => "fail_closed",
});

/// Parse a holiday feed body: a JSON object mapping ISO dates to names.
///
/// Every key must be a `YYYY-MM-DD` date inside `year`.
pub fn parse_iso_holiday_map(
    year: i32,
    entries: HashMap<String, String>,
) -> Result<Vec<Holiday>, FetchFailure> {
    let mut holidays = entries
        .into_iter()
        .map(|(key, name)| {
            let date = NaiveDate::parse_from_str(&key, "%Y-%m-%d")
                .map_err(|e| FetchFailure::Parse(format!("invalid date key {key:?}: {e}")))?;
            if date.year() != year {
                return Err(FetchFailure::Parse(format!(
                    "holiday {key} does not belong to {year}"
                )));
            }
            Ok(Holiday::new(date, name))
        })
        .collect::<Result<Vec<_>, _>>()?;
    holidays.sort_by_key(|h| h.date);
    Ok(holidays)
}
