//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DB_PATH, DEFAULT_DB_POOL_SIZE, DEFAULT_HOLIDAY_BACKOFF_MS,
    DEFAULT_HOLIDAY_CACHE_TTL_SECS, DEFAULT_HOLIDAY_ENDPOINT, DEFAULT_HOLIDAY_MAX_ATTEMPTS,
    DEFAULT_HOLIDAY_REQUEST_TIMEOUT_SECS, DEFAULT_JOB_TIMEOUT_SECS, DEFAULT_MONTHS_AHEAD,
    DEFAULT_SCHEDULE_CRON, DEFAULT_TIME_ZONE,
};
use crate::impl_domain_status_conversions;
use crate::types::HolidayFallback;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub holidays: HolidayConfig,
    pub storage: StorageConfig,
    pub schedule: ScheduleConfig,
    pub calendar: CalendarConfig,
    pub logging: LoggingConfig,
}

/// Holiday source and cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolidayConfig {
    /// URL template; `{year}` is replaced with the requested year.
    pub endpoint: String,
    pub cache_ttl_seconds: u64,
    pub request_timeout_seconds: u64,
    pub max_attempts: usize,
    pub backoff_millis: u64,
    pub fallback: HolidayFallback,
}

impl Default for HolidayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_HOLIDAY_ENDPOINT.to_string(),
            cache_ttl_seconds: DEFAULT_HOLIDAY_CACHE_TTL_SECS,
            request_timeout_seconds: DEFAULT_HOLIDAY_REQUEST_TIMEOUT_SECS,
            max_attempts: DEFAULT_HOLIDAY_MAX_ATTEMPTS,
            backoff_millis: DEFAULT_HOLIDAY_BACKOFF_MS,
            fallback: HolidayFallback::Defer,
        }
    }
}

/// Where patterns and generated events are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

impl_domain_status_conversions!(StorageBackend {
    Sqlite => "sqlite",
    Memory => "memory",
});

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: String,
    pub pool_size: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: DEFAULT_DB_PATH.to_string(),
            pool_size: DEFAULT_DB_POOL_SIZE,
        }
    }
}

/// Recurring generation schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Six-field cron expression (seconds first), evaluated in UTC.
    ///
    /// West of UTC the default 03:00 on the 1st fires on the last local day
    /// of the previous month; `months_ahead` of 2 or more still covers the
    /// new month.
    pub cron_expression: String,
    /// Months generated per run, starting with the current one.
    pub months_ahead: u32,
    pub job_timeout_seconds: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron_expression: DEFAULT_SCHEDULE_CRON.to_string(),
            months_ahead: DEFAULT_MONTHS_AHEAD,
            job_timeout_seconds: DEFAULT_JOB_TIMEOUT_SECS,
        }
    }
}

/// Local calendar settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// IANA zone used to decide what "the current month" is when a
    /// scheduled run fires. Does not shift the cron schedule itself.
    pub time_zone: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self { time_zone: DEFAULT_TIME_ZONE.to_string() }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
