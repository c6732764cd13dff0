use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use clubsched_core::HolidayCalendar;
use clubsched_domain::{FetchFailure, Holiday, HolidayFetchError, HolidaySet};
use parking_lot::Mutex;

/// Scripted `HolidayCalendar`.
///
/// Years are either seeded with a table or marked as failing; unknown years
/// answer with an empty table. Every call is counted.
#[derive(Default)]
pub struct MockHolidayCalendar {
    years: Mutex<HashMap<i32, Result<Arc<HolidaySet>, HolidayFetchError>>>,
    calls: AtomicUsize,
}

impl MockHolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `year` with holidays given as `(month, day, name)`.
    pub fn with_holidays(self, year: i32, holidays: &[(u32, u32, &str)]) -> Self {
        let fetched_at = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap();
        let set = HolidaySet::new(
            year,
            holidays.iter().map(|(m, d, name)| {
                Holiday::new(NaiveDate::from_ymd_opt(year, *m, *d).unwrap(), *name)
            }),
            fetched_at,
            fetched_at + Duration::days(1),
        );
        self.years.lock().insert(year, Ok(Arc::new(set)));
        self
    }

    /// Make every lookup for `year` fail with `failure`.
    pub fn failing(self, year: i32, failure: FetchFailure) -> Self {
        self.years.lock().insert(year, Err(HolidayFetchError::new(year, failure)));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HolidayCalendar for MockHolidayCalendar {
    async fn holidays(&self, year: i32) -> Result<Arc<HolidaySet>, HolidayFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(entry) = self.years.lock().get(&year) {
            return entry.clone();
        }
        let now = Utc::now();
        Ok(Arc::new(HolidaySet::new(year, Vec::new(), now, now + Duration::days(1))))
    }
}

/// Japanese public holidays used throughout the generator tests.
pub fn japan_2024() -> MockHolidayCalendar {
    MockHolidayCalendar::new().with_holidays(
        2024,
        &[
            (1, 1, "元日"),
            (1, 8, "成人の日"),
            (2, 11, "建国記念の日"),
            (2, 12, "休日 建国記念の日"),
            (4, 29, "昭和の日"),
            (5, 3, "憲法記念日"),
            (5, 6, "休日 こどもの日"),
        ],
    )
}
