//! Persistence ports for patterns and generated events

use async_trait::async_trait;
use chrono::NaiveDate;
use clubsched_domain::{GeneratedEventInstance, RecurrencePattern, Result};

/// Storage of recurrence patterns.
#[async_trait]
pub trait PatternRepository: Send + Sync {
    /// Patterns with `is_active` set, in stable id order.
    async fn list_active_patterns(&self) -> Result<Vec<RecurrencePattern>>;

    /// Every stored pattern, active or not.
    async fn list_patterns(&self) -> Result<Vec<RecurrencePattern>>;

    async fn get_pattern(&self, id: &str) -> Result<Option<RecurrencePattern>>;

    /// Insert or overwrite a pattern by id.
    async fn save_pattern(&self, pattern: &RecurrencePattern) -> Result<()>;

    /// Insert new patterns as one batch.
    ///
    /// Fails with `InvalidInput` if any id is already stored or repeats
    /// within the batch; on any error nothing from the batch is kept.
    async fn insert_patterns(&self, patterns: &[RecurrencePattern]) -> Result<()>;

    /// Clear `is_active` on a stored pattern.
    ///
    /// Returns `NotFound` when no pattern has that id.
    async fn deactivate_pattern(&self, id: &str) -> Result<()>;

    /// Store `revised` and retire the version it supersedes.
    async fn replace_pattern(&self, revised: &RecurrencePattern) -> Result<()> {
        self.save_pattern(revised).await?;
        if let Some(previous) = revised.supersedes() {
            self.deactivate_pattern(previous).await?;
        }
        Ok(())
    }
}

/// Storage of generated event instances.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert instances, ignoring any whose id is already stored.
    ///
    /// Returns the number of rows actually inserted.
    async fn upsert_events(&self, events: &[GeneratedEventInstance]) -> Result<usize>;

    /// Stored events dated within `[start, end]`, ordered by date.
    async fn list_events_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<GeneratedEventInstance>>;
}
