//! `generate` and `generate-ahead`

use std::fmt;

use chrono::Datelike;
use clubsched_common::Clock;
use clubsched_core::{GenerationReport, MonthOutcome, PartialGenerationWarning};
use clubsched_domain::{GeneratedEventInstance, Result, YearMonth};
use clubsched_infra::scheduling::{current_month_in, GenerationSchedulerConfig};
use serde::Serialize;

use crate::context::AppContext;

/// Result of generating a single month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSummary {
    pub month: YearMonth,
    pub dry_run: bool,
    pub generated: usize,
    /// Newly stored rows; `None` on a dry run.
    pub stored: Option<usize>,
    pub skipped_holidays: usize,
    pub warnings: Vec<PartialGenerationWarning>,
    pub instances: Vec<GeneratedEventInstance>,
}

impl GenerateSummary {
    fn from_report(report: GenerationReport, stored: Option<usize>) -> Self {
        Self {
            month: report.month,
            dry_run: stored.is_none(),
            generated: report.instances.len(),
            stored,
            skipped_holidays: report.skipped_holidays,
            warnings: report.warnings,
            instances: report.instances,
        }
    }
}

impl fmt::Display for GenerateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} event(s)", self.month, self.generated)?;
        match self.stored {
            Some(stored) => write!(f, ", {stored} newly stored")?,
            None => write!(f, " (dry run)")?,
        }
        write!(f, ", {} holiday date(s) skipped", self.skipped_holidays)?;

        for instance in &self.instances {
            write!(
                f,
                "\n  {} {} {}-{}  {} @ {}",
                instance.date,
                instance.date.weekday(),
                instance.start_time,
                instance.end_time,
                instance.title,
                instance.location
            )?;
        }
        for warning in &self.warnings {
            write!(f, "\n  warning: {warning}")?;
        }
        Ok(())
    }
}

/// Per-month line of a multi-month run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AheadMonth {
    pub month: YearMonth,
    pub generated: usize,
    pub stored: usize,
    pub skipped_holidays: usize,
    pub warnings: Vec<PartialGenerationWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a multi-month run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AheadSummary {
    pub months: Vec<AheadMonth>,
}

impl AheadSummary {
    pub fn from_outcomes(outcomes: Vec<MonthOutcome>) -> Self {
        let months = outcomes
            .into_iter()
            .map(|outcome| match outcome.result {
                Ok(generated) => AheadMonth {
                    month: outcome.month,
                    generated: generated.report.instances.len(),
                    stored: generated.stored,
                    skipped_holidays: generated.report.skipped_holidays,
                    warnings: generated.report.warnings,
                    error: None,
                },
                Err(err) => AheadMonth {
                    month: outcome.month,
                    generated: 0,
                    stored: 0,
                    skipped_holidays: 0,
                    warnings: Vec::new(),
                    error: Some(err.to_string()),
                },
            })
            .collect();
        Self { months }
    }

    pub fn failed_months(&self) -> usize {
        self.months.iter().filter(|m| m.error.is_some()).count()
    }
}

impl fmt::Display for AheadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for month in &self.months {
            if !first {
                writeln!(f)?;
            }
            first = false;

            match &month.error {
                Some(error) => write!(f, "{}: failed: {error}", month.month)?,
                None => write!(
                    f,
                    "{}: {} event(s), {} newly stored, {} holiday date(s) skipped",
                    month.month, month.generated, month.stored, month.skipped_holidays
                )?,
            }
            for warning in &month.warnings {
                write!(f, "\n  warning: {warning}")?;
            }
        }
        Ok(())
    }
}

/// Generate one month; with `dry_run` nothing is stored.
pub async fn generate(ctx: &AppContext, month: YearMonth, dry_run: bool) -> Result<GenerateSummary> {
    if dry_run {
        let report = ctx.service.preview_month(month).await?;
        return Ok(GenerateSummary::from_report(report, None));
    }

    let outcome = ctx.service.generate_month(month).await?;
    Ok(GenerateSummary::from_report(outcome.report, Some(outcome.stored)))
}

/// Generate `months` months starting with the current one in the configured
/// time zone. `None` uses the scheduler's configured count.
pub async fn generate_ahead(ctx: &AppContext, months: Option<u32>) -> Result<AheadSummary> {
    let schedule = GenerationSchedulerConfig::from_config(&ctx.config)?;
    let start = current_month_in(schedule.time_zone, ctx.clock.now());
    let months = months.unwrap_or(schedule.months_ahead);

    let outcomes = ctx.service.generate_ahead(start, months).await?;
    Ok(AheadSummary::from_outcomes(outcomes))
}
