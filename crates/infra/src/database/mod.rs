//! Database implementations

pub mod event_repository;
pub mod manager;
pub mod pattern_repository;

pub use event_repository::SqliteEventRepository;
pub use manager::{DbManager, SqliteConnection};
pub use pattern_repository::SqlitePatternRepository;

use std::str::FromStr;

use chrono::NaiveDate;
use clubsched_domain::ClubSchedError;
use tokio::task;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(raw: &str) -> Result<NaiveDate, ClubSchedError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| ClubSchedError::Database(format!("invalid stored date {raw:?}: {e}")))
}

fn parse_enum<T>(raw: &str) -> Result<T, ClubSchedError>
where
    T: FromStr<Err = String>,
{
    raw.parse::<T>().map_err(|e| ClubSchedError::Database(format!("invalid stored value: {e}")))
}

fn map_join_error(err: task::JoinError) -> ClubSchedError {
    if err.is_cancelled() {
        ClubSchedError::Internal("blocking database task cancelled".into())
    } else {
        ClubSchedError::Internal(format!("blocking database task failed: {err}"))
    }
}
