//! Port interfaces for public holiday data
//!
//! These traits define the boundaries between core business logic
//! and the infrastructure that fetches and caches holiday tables.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use clubsched_domain::{Holiday, HolidayFetchError, HolidaySet};

/// Raw source of holiday tables (typically a remote HTTP feed).
#[async_trait]
pub trait HolidayProvider: Send + Sync {
    /// Fetch every public holiday of `year`.
    async fn fetch_holidays(&self, year: i32) -> Result<Vec<Holiday>, HolidayFetchError>;
}

/// Holiday lookups with whatever caching the implementation applies.
#[async_trait]
pub trait HolidayCalendar: Send + Sync {
    /// Holiday table for `year`.
    ///
    /// Fails only when no usable table exists for the year; an expired
    /// table is preferred over an error.
    async fn holidays(&self, year: i32) -> Result<Arc<HolidaySet>, HolidayFetchError>;

    /// Whether `date` is a public holiday.
    async fn is_holiday(&self, date: NaiveDate) -> Result<bool, HolidayFetchError> {
        Ok(self.holidays(date.year()).await?.contains(date))
    }
}
