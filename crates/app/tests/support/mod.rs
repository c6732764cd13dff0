#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;

use chrono::NaiveDate;
use clubsched_app::AppContext;
use clubsched_common::MockClock;
use clubsched_domain::{Config, Holiday, StorageBackend};
use clubsched_infra::{Repositories, StaticHolidayProvider};
use tempfile::NamedTempFile;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn memory_config() -> Config {
    let mut config = Config::default();
    config.storage.backend = StorageBackend::Memory;
    config
}

/// Context over memory storage with a fixed holiday table and a clock
/// pinned to 2024-04-10.
pub fn test_context(holidays: Vec<Holiday>) -> AppContext {
    context_with(memory_config(), holidays)
}

pub fn context_with(config: Config, holidays: Vec<Holiday>) -> AppContext {
    let clock = MockClock::at_ymd(2024, 4, 10).unwrap();
    AppContext::with_parts(
        config,
        Repositories::memory(),
        Arc::new(StaticHolidayProvider::with_holidays(holidays)),
        Arc::new(clock),
    )
}

pub fn golden_week_2024() -> Vec<Holiday> {
    vec![
        Holiday::new(date(2024, 4, 29), "Showa Day"),
        Holiday::new(date(2024, 5, 3), "Constitution Memorial Day"),
        Holiday::new(date(2024, 5, 4), "Greenery Day"),
        Holiday::new(date(2024, 5, 5), "Children's Day"),
        Holiday::new(date(2024, 5, 6), "Substitute Holiday"),
    ]
}

/// Monday practice from 2024-01-01 that skips holidays.
pub fn monday_practice_json(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": "Monday practice",
        "location": "Gym",
        "startTime": "18:00",
        "endTime": "20:00",
        "eventType": "practice",
        "kind": "weekly",
        "dayOfWeek": 1,
        "skipHolidays": true,
        "validFrom": "2024-01-01"
    })
}

/// Second-Saturday game from 2024-01-01.
pub fn second_saturday_game_json(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": "League game",
        "location": "Field 2",
        "startTime": "10:00",
        "endTime": "12:30",
        "eventType": "game",
        "kind": "monthly",
        "dayOfWeek": 6,
        "weekOfMonth": 2,
        "validFrom": "2024-01-01"
    })
}

pub fn json_file(value: &serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(value.to_string().as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
