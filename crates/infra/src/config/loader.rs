//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `CLUBSCHED_STORAGE_PATH` is unset, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. With no file anywhere, built-in defaults apply
//!
//! ## Environment Variables
//! - `CLUBSCHED_STORAGE_PATH`: Database file path (required for env loading)
//! - `CLUBSCHED_STORAGE_BACKEND`: `sqlite` or `memory`
//! - `CLUBSCHED_STORAGE_POOL_SIZE`: Connection pool size
//! - `CLUBSCHED_HOLIDAY_ENDPOINT`: Holiday feed URL containing `{year}`
//! - `CLUBSCHED_HOLIDAY_CACHE_TTL`: Cache TTL in seconds
//! - `CLUBSCHED_HOLIDAY_TIMEOUT`: Request timeout in seconds
//! - `CLUBSCHED_HOLIDAY_MAX_ATTEMPTS`: Attempts per fetch, including the first
//! - `CLUBSCHED_HOLIDAY_FALLBACK`: `defer`, `fail_open` or `fail_closed`
//! - `CLUBSCHED_SCHEDULE_CRON`: Six-field cron expression
//! - `CLUBSCHED_MONTHS_AHEAD`: Months generated per scheduled run
//! - `CLUBSCHED_TIME_ZONE`: IANA time zone name
//! - `CLUBSCHED_LOG_LEVEL`: Default log filter
//! - `CLUBSCHED_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./clubsched.{toml,json}` or `./config.{toml,json}` (current working
//!    directory)
//! 2. The same names in the parent and grandparent directories
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_tz::Tz;
use clubsched_domain::constants::{MAX_MONTHS_AHEAD, YEAR_PLACEHOLDER};
use clubsched_domain::{ClubSchedError, Config, Result};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["clubsched.toml", "clubsched.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// Environment first, then the first config file found by
/// [`probe_config_paths`], then defaults. The result is validated.
///
/// # Errors
/// Returns `ClubSchedError::Config` if an environment value or a config file
/// is invalid.
pub fn load() -> Result<Config> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path))?,
                None => {
                    tracing::info!("No config file found, using defaults");
                    Config::default()
                }
            }
        }
    };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from an explicit file, or fall back to [`load`].
pub fn load_with_path(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            let config = load_from_file(Some(path))?;
            validate(&config)?;
            Ok(config)
        }
        None => load(),
    }
}

/// Load configuration from environment variables
///
/// `CLUBSCHED_STORAGE_PATH` must be present; every other variable is
/// optional and falls back to its default.
///
/// # Errors
/// Returns `ClubSchedError::Config` if the storage path is missing or a
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();
    config.storage.path = env_var("CLUBSCHED_STORAGE_PATH")?;

    if let Some(backend) = env_parse("CLUBSCHED_STORAGE_BACKEND")? {
        config.storage.backend = backend;
    }
    if let Some(pool_size) = env_parse("CLUBSCHED_STORAGE_POOL_SIZE")? {
        config.storage.pool_size = pool_size;
    }

    if let Ok(endpoint) = std::env::var("CLUBSCHED_HOLIDAY_ENDPOINT") {
        config.holidays.endpoint = endpoint;
    }
    if let Some(ttl) = env_parse("CLUBSCHED_HOLIDAY_CACHE_TTL")? {
        config.holidays.cache_ttl_seconds = ttl;
    }
    if let Some(timeout) = env_parse("CLUBSCHED_HOLIDAY_TIMEOUT")? {
        config.holidays.request_timeout_seconds = timeout;
    }
    if let Some(attempts) = env_parse("CLUBSCHED_HOLIDAY_MAX_ATTEMPTS")? {
        config.holidays.max_attempts = attempts;
    }
    if let Some(fallback) = env_parse("CLUBSCHED_HOLIDAY_FALLBACK")? {
        config.holidays.fallback = fallback;
    }

    if let Ok(cron) = std::env::var("CLUBSCHED_SCHEDULE_CRON") {
        config.schedule.cron_expression = cron;
    }
    if let Some(months) = env_parse("CLUBSCHED_MONTHS_AHEAD")? {
        config.schedule.months_ahead = months;
    }
    if let Ok(tz) = std::env::var("CLUBSCHED_TIME_ZONE") {
        config.calendar.time_zone = tz;
    }

    if let Ok(level) = std::env::var("CLUBSCHED_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("CLUBSCHED_LOG_JSON", config.logging.json);

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ClubSchedError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ClubSchedError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ClubSchedError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ClubSchedError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ClubSchedError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ClubSchedError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ClubSchedError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Reject configurations that would only fail later at runtime.
pub fn validate(config: &Config) -> Result<()> {
    if !config.holidays.endpoint.contains(YEAR_PLACEHOLDER) {
        return Err(ClubSchedError::Config(format!(
            "holidays.endpoint must contain {YEAR_PLACEHOLDER}"
        )));
    }
    if config.holidays.max_attempts == 0 {
        return Err(ClubSchedError::Config("holidays.max_attempts must be at least 1".into()));
    }
    if config.storage.pool_size == 0 {
        return Err(ClubSchedError::Config("storage.pool_size must be at least 1".into()));
    }
    if !(1..=MAX_MONTHS_AHEAD).contains(&config.schedule.months_ahead) {
        return Err(ClubSchedError::Config(format!(
            "schedule.months_ahead must be between 1 and {MAX_MONTHS_AHEAD}"
        )));
    }
    Tz::from_str(&config.calendar.time_zone).map_err(|_| {
        ClubSchedError::Config(format!("unknown time zone: {}", config.calendar.time_zone))
    })?;
    Ok(())
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its two parents and the
/// executable's directory for the standard file names.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        ClubSchedError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable, `None` when unset.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ClubSchedError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
