//! Configuration files feeding storage and scheduler setup.

use std::io::Write;

use clubsched_domain::{HolidayFallback, StorageBackend};
use clubsched_infra::config;
use clubsched_infra::scheduling::GenerationSchedulerConfig;
use clubsched_infra::Repositories;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn toml_file_opens_sqlite_storage() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("events.db");
    let path = write_config(
        &dir,
        "clubsched.toml",
        &format!(
            r#"
[storage]
backend = "sqlite"
path = "{}"
pool_size = 2

[holidays]
fallback = "fail_closed"
"#,
            db_path.display()
        ),
    );

    let config = config::load_with_path(Some(path)).unwrap();
    let repos = Repositories::open(&config.storage).unwrap();

    assert_eq!(config.holidays.fallback, HolidayFallback::FailClosed);
    assert_eq!(repos.backend(), StorageBackend::Sqlite);
    repos.health_check().unwrap();
    assert!(db_path.exists());
}

#[test]
fn json_file_configures_scheduler() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "clubsched.json",
        r#"{
            "storage": { "backend": "memory" },
            "schedule": { "cron_expression": "0 30 2 * * *", "months_ahead": 3 },
            "calendar": { "time_zone": "Asia/Tokyo" }
        }"#,
    );

    let config = config::load_with_path(Some(path)).unwrap();
    let scheduler = GenerationSchedulerConfig::from_config(&config).unwrap();

    assert_eq!(Repositories::open(&config.storage).unwrap().backend(), StorageBackend::Memory);
    assert_eq!(scheduler.cron_expression, "0 30 2 * * *");
    assert_eq!(scheduler.months_ahead, 3);
    assert_eq!(scheduler.time_zone, chrono_tz::Asia::Tokyo);
}

#[test]
fn unknown_time_zone_is_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "clubsched.toml", "[calendar]\ntime_zone = \"Nowhere/Special\"\n");

    assert!(config::load_with_path(Some(path)).is_err());
}
