//! Generation service - ties pattern storage, generation and event storage together

use std::collections::HashSet;
use std::sync::Arc;

use clubsched_domain::constants::MAX_MONTHS_AHEAD;
use clubsched_domain::{ClubSchedError, PatternRecord, RecurrencePattern, Result, YearMonth};
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::generator::{EventGenerator, GenerationReport};
use super::ports::{EventRepository, PatternRepository};

/// Outcome of generating and storing one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub report: GenerationReport,
    /// Rows newly inserted; instances already stored are not counted.
    pub stored: usize,
}

/// Per-month result of a multi-month run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthOutcome {
    pub month: YearMonth,
    pub result: Result<GenerationOutcome>,
}

/// Recurring event generation use cases
pub struct GenerationService {
    patterns: Arc<dyn PatternRepository>,
    events: Arc<dyn EventRepository>,
    generator: EventGenerator,
}

impl GenerationService {
    pub fn new(
        patterns: Arc<dyn PatternRepository>,
        events: Arc<dyn EventRepository>,
        generator: EventGenerator,
    ) -> Self {
        Self { patterns, events, generator }
    }

    /// Generate `month` without storing anything.
    pub async fn preview_month(&self, month: YearMonth) -> Result<GenerationReport> {
        let patterns = self.patterns.list_active_patterns().await?;
        Ok(self.generator.generate_for_month(&patterns, month).await)
    }

    /// Generate `month` and store the instances.
    ///
    /// Re-running for a month that is already stored inserts nothing.
    pub async fn generate_month(&self, month: YearMonth) -> Result<GenerationOutcome> {
        let report = self.preview_month(month).await?;
        let stored = self.events.upsert_events(&report.instances).await?;

        for warning in &report.warnings {
            warn!(%month, %warning, "partial generation");
        }
        info!(
            %month,
            generated = report.instances.len(),
            stored,
            skipped_holidays = report.skipped_holidays,
            warnings = report.warnings.len(),
            "month generated"
        );

        Ok(GenerationOutcome { report, stored })
    }

    /// Generate `months` consecutive months starting at `start`.
    ///
    /// Months run concurrently and fail independently; outcomes come back in
    /// month order.
    pub async fn generate_ahead(&self, start: YearMonth, months: u32) -> Result<Vec<MonthOutcome>> {
        if months == 0 || months > MAX_MONTHS_AHEAD {
            return Err(ClubSchedError::InvalidInput(format!(
                "months must be between 1 and {MAX_MONTHS_AHEAD}, got {months}"
            )));
        }

        let range = start.successors(months);
        let results = join_all(range.iter().map(|month| self.generate_month(*month))).await;

        Ok(range
            .into_iter()
            .zip(results)
            .map(|(month, result)| {
                if let Err(err) = &result {
                    warn!(%month, error = %err, "month generation failed");
                }
                MonthOutcome { month, result }
            })
            .collect())
    }

    pub async fn list_patterns(&self) -> Result<Vec<RecurrencePattern>> {
        self.patterns.list_patterns().await
    }

    /// Validate and store new patterns.
    ///
    /// Every record is validated before anything is written and the batch is
    /// stored atomically, so a bad record leaves the store untouched. Ids
    /// that already exist are rejected; edits go through
    /// [`GenerationService::revise_pattern`].
    pub async fn import_patterns(&self, records: Vec<PatternRecord>) -> Result<Vec<RecurrencePattern>> {
        let patterns = records
            .into_iter()
            .map(RecurrencePattern::new)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = patterns.iter().find(|p| !seen.insert(p.id())) {
            return Err(ClubSchedError::InvalidInput(format!(
                "pattern {} appears more than once in the import",
                duplicate.id()
            )));
        }

        self.patterns.insert_patterns(&patterns).await?;
        info!(count = patterns.len(), "patterns imported");
        Ok(patterns)
    }

    /// Replace pattern `id` with a new version built from `record`.
    ///
    /// Events already generated from the old version are left as they are.
    pub async fn revise_pattern(&self, id: &str, record: PatternRecord) -> Result<RecurrencePattern> {
        let current = self
            .patterns
            .get_pattern(id)
            .await?
            .ok_or_else(|| ClubSchedError::NotFound(format!("pattern {id}")))?;
        let revised = current.revise(record)?;
        self.patterns.replace_pattern(&revised).await?;
        info!(previous = id, revised = revised.id(), "pattern revised");
        Ok(revised)
    }

    pub async fn deactivate_pattern(&self, id: &str) -> Result<()> {
        self.patterns.deactivate_pattern(id).await
    }
}
