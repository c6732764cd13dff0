//! Conversions from external infrastructure errors into domain errors.

use clubsched_domain::{ClubSchedError, FetchFailure};
use r2d2::Error as PoolError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ClubSchedError);

impl From<InfraError> for ClubSchedError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ClubSchedError> for InfraError {
    fn from(value: ClubSchedError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoClubSchedError {
    fn into_clubsched(self) -> ClubSchedError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → ClubSchedError */
/* -------------------------------------------------------------------------- */

impl IntoClubSchedError for SqlError {
    fn into_clubsched(self) -> ClubSchedError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        ClubSchedError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        ClubSchedError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067 | 1555) => {
                        ClubSchedError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::CannotOpen, _) => {
                        ClubSchedError::Database(format!("unable to open database: {message}"))
                    }
                    _ => ClubSchedError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => ClubSchedError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                ClubSchedError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                ClubSchedError::Database(format!("invalid column type for {name}: {ty}"))
            }
            RE::InvalidPath(path) => ClubSchedError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => ClubSchedError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_clubsched())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → ClubSchedError */
/* -------------------------------------------------------------------------- */

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(ClubSchedError::Database(format!("connection pool: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ClubSchedError */
/* -------------------------------------------------------------------------- */

impl IntoClubSchedError for HttpError {
    fn into_clubsched(self) -> ClubSchedError {
        if self.is_timeout() {
            return ClubSchedError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ClubSchedError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                404 => ClubSchedError::NotFound(message),
                400..=499 if code != 429 => ClubSchedError::InvalidInput(message),
                _ => ClubSchedError::Network(message),
            };
        }

        if self.is_decode() {
            return ClubSchedError::Network(format!("malformed response body: {self}"));
        }

        ClubSchedError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_clubsched())
    }
}

/// Classify a transport error from the holiday source.
pub fn fetch_failure_from_http(err: &HttpError) -> FetchFailure {
    if err.is_timeout() {
        FetchFailure::Timeout
    } else if let Some(status) = err.status() {
        FetchFailure::Status(status.as_u16())
    } else if err.is_decode() {
        FetchFailure::Parse(err.to_string())
    } else {
        FetchFailure::Unreachable(err.to_string())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
