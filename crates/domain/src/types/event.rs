//! Concrete event instances produced by evaluating patterns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::INSTANCE_ID_NAMESPACE;
use crate::types::calendar::TimeOfDay;
use crate::types::pattern::{EventType, RecurrencePattern};

/// Deterministic instance id for a pattern occurrence.
///
/// UUID v5 over `"{pattern_id}:{YYYY-MM-DD}"`, so regenerating a month
/// always yields the same ids.
pub fn instance_id(pattern_id: &str, date: NaiveDate) -> Uuid {
    let name = format!("{pattern_id}:{}", date.format("%Y-%m-%d"));
    Uuid::new_v5(&INSTANCE_ID_NAMESPACE, name.as_bytes())
}

/// One dated event generated from a recurrence pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedEventInstance {
    pub id: Uuid,
    pub title: String,
    pub event_type: EventType,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_recurring: bool,
    pub recurring_pattern_id: String,
}

impl GeneratedEventInstance {
    /// Instance of `pattern` on `date`.
    pub fn from_pattern(pattern: &RecurrencePattern, date: NaiveDate) -> Self {
        Self {
            id: instance_id(pattern.id(), date),
            title: pattern.title().to_string(),
            event_type: pattern.event_type(),
            date,
            start_time: pattern.start_time(),
            end_time: pattern.end_time(),
            location: pattern.location().to_string(),
            description: pattern.description().map(str::to_string),
            is_recurring: true,
            recurring_pattern_id: pattern.id().to_string(),
        }
    }
}
