//! Application constants
//!
//! Centralized location for domain-level defaults used throughout the
//! application.

use uuid::Uuid;

// Holiday source
pub const YEAR_PLACEHOLDER: &str = "{year}";
pub const DEFAULT_HOLIDAY_ENDPOINT: &str = "https://holidays-jp.github.io/api/v1/{year}/date.json";
pub const DEFAULT_HOLIDAY_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_HOLIDAY_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HOLIDAY_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_HOLIDAY_BACKOFF_MS: u64 = 200;

// Storage
pub const DEFAULT_DB_PATH: &str = "clubsched.db";
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;

// Scheduling: 03:00 on the first day of every month (sec min hour dom mon dow)
pub const DEFAULT_SCHEDULE_CRON: &str = "0 0 3 1 * *";
pub const DEFAULT_MONTHS_AHEAD: u32 = 2;
pub const MAX_MONTHS_AHEAD: u32 = 24;
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 300;

// Calendar
pub const DEFAULT_TIME_ZONE: &str = "UTC";

// Recurrence
pub const MAX_WEEK_OF_MONTH: u8 = 4;
pub const DAYS_PER_WEEK: i64 = 7;

/// Namespace for deterministic event instance ids (UUID v5).
pub const INSTANCE_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6c75_6273_6368_4564_8000_0000_6576_6e74);
