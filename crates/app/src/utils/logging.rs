use std::time::Duration;

use clubsched_domain::{ClubSchedError, LoggingConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr so command
/// output on stdout stays machine-readable.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ClubSchedError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| {
            ClubSchedError::Config(format!("invalid log level '{}': {e}", config.level))
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| ClubSchedError::Internal(format!("failed to install logger: {e}")))
}

/// Log the outcome of a command execution with structured fields.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&ClubSchedError>) {
    let duration_ms = elapsed.as_millis() as u64;

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(err) => {
            warn!(command, duration_ms, error_type = error_label(err), "command_execution_failure")
        }
    }
}

/// Convert a `ClubSchedError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &ClubSchedError) -> &'static str {
    match error {
        ClubSchedError::Database(_) => "database",
        ClubSchedError::Config(_) => "config",
        ClubSchedError::Network(_) => "network",
        ClubSchedError::NotFound(_) => "not_found",
        ClubSchedError::InvalidInput(_) => "invalid_input",
        ClubSchedError::Internal(_) => "internal",
        ClubSchedError::Validation(_) => "validation",
        ClubSchedError::HolidayFetch(_) => "holiday_fetch",
    }
}
