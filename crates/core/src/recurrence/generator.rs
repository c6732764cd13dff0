//! Month-by-month expansion of patterns into event instances.

use std::collections::HashMap;
use std::sync::Arc;

use clubsched_domain::{
    GeneratedEventInstance, HolidayFallback, HolidayFetchError, HolidaySet, RecurrencePattern,
    YearMonth,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::dates::expand_dates;
use crate::holidays::{apply_fallback, HolidayCalendar};

/// A pattern whose holiday status could not be determined.
///
/// Reported alongside the instances that were generated, never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialGenerationWarning {
    pub pattern_id: String,
    pub pattern_title: String,
    pub year: i32,
    pub error: HolidayFetchError,
    /// Policy that decided what (if anything) was generated.
    pub fallback: HolidayFallback,
}

impl std::fmt::Display for PartialGenerationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pattern {} ({}) not fully evaluated [{}]: {}",
            self.pattern_id, self.pattern_title, self.fallback, self.error
        )
    }
}

/// Result of evaluating a set of patterns over one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub month: YearMonth,
    /// Instances grouped by pattern, ascending by date within a pattern.
    pub instances: Vec<GeneratedEventInstance>,
    pub warnings: Vec<PartialGenerationWarning>,
    /// Candidate dates dropped because they were known holidays.
    pub skipped_holidays: usize,
}

impl GenerationReport {
    fn empty(month: YearMonth) -> Self {
        Self { month, instances: Vec::new(), warnings: Vec::new(), skipped_holidays: 0 }
    }

    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

type HolidayLookup = Result<Arc<HolidaySet>, HolidayFetchError>;

/// Evaluates recurrence patterns against a holiday calendar.
#[derive(Clone)]
pub struct EventGenerator {
    calendar: Arc<dyn HolidayCalendar>,
    fallback: HolidayFallback,
}

impl EventGenerator {
    pub fn new(calendar: Arc<dyn HolidayCalendar>) -> Self {
        Self { calendar, fallback: HolidayFallback::default() }
    }

    pub fn with_fallback(mut self, fallback: HolidayFallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> HolidayFallback {
        self.fallback
    }

    /// Generate the instances `patterns` produce in `month`.
    ///
    /// Inactive patterns are ignored. The holiday table for a year is
    /// requested at most once per call and reused for every pattern, so a
    /// single call sees one consistent table even if the calendar refreshes
    /// mid-run. A failed lookup only affects patterns that skip holidays;
    /// each of those gets a warning and is handled by the fallback policy.
    pub async fn generate_for_month(
        &self,
        patterns: &[RecurrencePattern],
        month: YearMonth,
    ) -> GenerationReport {
        let mut report = GenerationReport::empty(month);
        let mut memo: HashMap<i32, HolidayLookup> = HashMap::new();

        for pattern in patterns.iter().filter(|p| p.is_active()) {
            let candidates = expand_dates(pattern, month);
            if candidates.is_empty() {
                continue;
            }

            let dates = if pattern.skip_holidays() {
                match self.lookup(&mut memo, month.year()).await {
                    Ok(set) => {
                        let before = candidates.len();
                        let kept: Vec<_> =
                            candidates.into_iter().filter(|d| !set.contains(*d)).collect();
                        report.skipped_holidays += before - kept.len();
                        kept
                    }
                    Err(error) => {
                        warn!(
                            pattern_id = pattern.id(),
                            %month,
                            error = %error,
                            policy = %self.fallback,
                            "holiday table unavailable for pattern"
                        );
                        let assume_holiday = apply_fallback(error.clone(), self.fallback);
                        report.warnings.push(PartialGenerationWarning {
                            pattern_id: pattern.id().to_string(),
                            pattern_title: pattern.title().to_string(),
                            year: month.year(),
                            error,
                            fallback: self.fallback,
                        });
                        match assume_holiday {
                            Ok(false) => candidates,
                            Ok(true) | Err(_) => Vec::new(),
                        }
                    }
                }
            } else {
                candidates
            };

            report
                .instances
                .extend(dates.into_iter().map(|d| GeneratedEventInstance::from_pattern(pattern, d)));
        }

        debug!(
            %month,
            instances = report.instances.len(),
            warnings = report.warnings.len(),
            skipped_holidays = report.skipped_holidays,
            "generated month"
        );
        report
    }

    async fn lookup(&self, memo: &mut HashMap<i32, HolidayLookup>, year: i32) -> HolidayLookup {
        if let Some(cached) = memo.get(&year) {
            return cached.clone();
        }
        let result = self.calendar.holidays(year).await;
        memo.insert(year, result.clone());
        result
    }
}
