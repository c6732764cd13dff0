#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use clubsched_core::HolidayProvider;
use clubsched_domain::{
    EventType, FetchFailure, Holiday, HolidayFetchError, PatternRecord, RecurrenceKind,
    RecurrencePattern,
};
use clubsched_infra::DbManager;
use parking_lot::Mutex;
use tempfile::TempDir;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Provider answering from a script; once the script runs out it keeps
/// repeating the last answer.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<Vec<Holiday>, FetchFailure>>>,
    last: Mutex<Option<Result<Vec<Holiday>, FetchFailure>>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<Vec<Holiday>, FetchFailure>>) -> Arc<Self> {
        Self::with_delay(script, Duration::ZERO)
    }

    pub fn with_delay(
        script: Vec<Result<Vec<Holiday>, FetchFailure>>,
        delay: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
            delay,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HolidayProvider for ScriptedProvider {
    async fn fetch_holidays(&self, year: i32) -> Result<Vec<Holiday>, HolidayFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let next = self.script.lock().pop_front();
        let answer = match next {
            Some(answer) => {
                *self.last.lock() = Some(answer.clone());
                answer
            }
            None => self.last.lock().clone().unwrap_or(Ok(Vec::new())),
        };
        answer.map_err(|failure| HolidayFetchError::new(year, failure))
    }
}

pub fn new_year_2024() -> Vec<Holiday> {
    vec![Holiday::new(date(2024, 1, 1), "New Year's Day")]
}

pub fn with_coming_of_age_2024() -> Vec<Holiday> {
    vec![
        Holiday::new(date(2024, 1, 1), "New Year's Day"),
        Holiday::new(date(2024, 1, 8), "Coming of Age Day"),
    ]
}

pub fn weekly_record(id: &str, day_of_week: i64) -> PatternRecord {
    PatternRecord {
        id: Some(id.to_string()),
        title: format!("Weekly {id}"),
        location: "Gym".into(),
        description: Some("Bring water".into()),
        start_time: "18:00".into(),
        end_time: "20:00".into(),
        event_type: EventType::Practice,
        kind: RecurrenceKind::Weekly,
        day_of_week,
        week_of_month: None,
        skip_holidays: false,
        valid_from: date(2024, 1, 1),
        valid_until: None,
        is_active: true,
        supersedes: None,
    }
}

pub fn weekly(id: &str, day_of_week: i64) -> RecurrencePattern {
    RecurrencePattern::new(weekly_record(id, day_of_week)).unwrap()
}

pub fn monthly(id: &str, day_of_week: i64, week_of_month: i64) -> RecurrencePattern {
    RecurrencePattern::new(PatternRecord {
        kind: RecurrenceKind::Monthly,
        week_of_month: Some(week_of_month),
        event_type: EventType::Game,
        ..weekly_record(id, day_of_week)
    })
    .unwrap()
}

pub fn skipping_holidays(pattern: RecurrencePattern) -> RecurrencePattern {
    let mut record = pattern.to_record();
    record.skip_holidays = true;
    RecurrencePattern::new(record).unwrap()
}

/// Migrated database in a temporary directory that lives as long as the
/// returned guard.
pub fn temp_db() -> (Arc<DbManager>, TempDir) {
    let dir = TempDir::new().unwrap();
    let db = DbManager::new(dir.path().join("clubsched.db"), 2).unwrap();
    db.run_migrations().unwrap();
    (Arc::new(db), dir)
}
