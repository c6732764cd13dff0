//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for clubsched
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ClubSchedError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    HolidayFetch(#[from] HolidayFetchError),
}

/// Result type alias for clubsched operations
pub type Result<T> = std::result::Result<T, ClubSchedError>;

/// Field of a recurrence pattern that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternField {
    Id,
    Title,
    Kind,
    DayOfWeek,
    WeekOfMonth,
    StartTime,
    EndTime,
    ValidFrom,
    ValidUntil,
}

impl PatternField {
    /// Wire name of the field, as it appears in pattern records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Kind => "kind",
            Self::DayOfWeek => "dayOfWeek",
            Self::WeekOfMonth => "weekOfMonth",
            Self::StartTime => "startTime",
            Self::EndTime => "endTime",
            Self::ValidFrom => "validFrom",
            Self::ValidUntil => "validUntil",
        }
    }
}

impl std::fmt::Display for PatternField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recurrence pattern was structurally invalid at creation time.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("invalid pattern field `{field}`: {message}")]
pub struct ValidationError {
    pub field: PatternField,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: PatternField, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// Why a holiday table could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchFailure {
    /// Connection refused, DNS failure and similar transport errors.
    Unreachable(String),
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The source answered with a non-success HTTP status.
    Status(u16),
    /// The body was not a valid holiday table.
    Parse(String),
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreachable(msg) => write!(f, "source unreachable: {msg}"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Status(code) => write!(f, "unexpected HTTP status {code}"),
            Self::Parse(msg) => write!(f, "malformed holiday data: {msg}"),
        }
    }
}

/// The holiday table for a year is unavailable and nothing usable is cached.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("failed to fetch holidays for {year}: {failure}")]
pub struct HolidayFetchError {
    pub year: i32,
    pub failure: FetchFailure,
}

impl HolidayFetchError {
    pub fn new(year: i32, failure: FetchFailure) -> Self {
        Self { year, failure }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_the_field() {
        let err = ValidationError::new(PatternField::WeekOfMonth, "must be between 1 and 4");
        assert_eq!(err.to_string(), "invalid pattern field `weekOfMonth`: must be between 1 and 4");
    }

    #[test]
    fn holiday_fetch_error_mentions_year_and_cause() {
        let err = HolidayFetchError::new(2024, FetchFailure::Status(503));
        let message = err.to_string();
        assert!(message.contains("2024"));
        assert!(message.contains("503"));
    }

    #[test]
    fn nested_errors_convert_into_domain_error() {
        let err: ClubSchedError = ValidationError::new(PatternField::Title, "empty").into();
        assert!(matches!(err, ClubSchedError::Validation(ref v) if v.field == PatternField::Title));

        let err: ClubSchedError = HolidayFetchError::new(2025, FetchFailure::Timeout).into();
        assert!(matches!(err, ClubSchedError::HolidayFetch(_)));
    }

    #[test]
    fn domain_error_serializes_tagged() {
        let err = ClubSchedError::NotFound("pattern p-1".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "NotFound");
        assert_eq!(json["message"], "pattern p-1");
    }
}
