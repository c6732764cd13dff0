//! `patterns list|import|revise|deactivate`

use std::fmt;
use std::path::Path;

use clubsched_core::PatternRepository;
use clubsched_domain::{ClubSchedError, PatternRecord, Recurrence, RecurrencePattern, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::context::AppContext;

/// Patterns affected or listed by a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternListing {
    pub patterns: Vec<RecurrencePattern>,
}

impl fmt::Display for PatternListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pattern(s)", self.patterns.len())?;
        for pattern in &self.patterns {
            write!(
                f,
                "\n  {} [{}] {}: {} {}-{} @ {}",
                pattern.id(),
                if pattern.is_active() { "active" } else { "inactive" },
                pattern.title(),
                describe(pattern.recurrence()),
                pattern.start_time(),
                pattern.end_time(),
                pattern.location()
            )?;
            if pattern.skip_holidays() {
                write!(f, ", skips holidays")?;
            }
        }
        Ok(())
    }
}

fn describe(recurrence: Recurrence) -> String {
    match recurrence {
        Recurrence::Weekly { weekday } => format!("every {weekday}"),
        Recurrence::Monthly { weekday, week_of_month } => {
            let ordinal = match week_of_month {
                1 => "1st",
                2 => "2nd",
                3 => "3rd",
                _ => "4th",
            };
            format!("{ordinal} {weekday} of the month")
        }
    }
}

pub async fn list(ctx: &AppContext, include_inactive: bool) -> Result<PatternListing> {
    let patterns = if include_inactive {
        ctx.service.list_patterns().await?
    } else {
        ctx.repositories.patterns().list_active_patterns().await?
    };
    Ok(PatternListing { patterns })
}

/// Import every record in `path`; nothing is stored if any record is invalid.
pub async fn import(ctx: &AppContext, path: &Path) -> Result<PatternListing> {
    let records: Vec<PatternRecord> = read_json(path)?;
    let patterns = ctx.service.import_patterns(records).await?;
    Ok(PatternListing { patterns })
}

/// Replace pattern `id` with the edited record in `path`.
pub async fn revise(ctx: &AppContext, id: &str, path: &Path) -> Result<PatternListing> {
    let record: PatternRecord = read_json(path)?;
    let revised = ctx.service.revise_pattern(id, record).await?;
    Ok(PatternListing { patterns: vec![revised] })
}

pub async fn deactivate(ctx: &AppContext, id: &str) -> Result<PatternListing> {
    ctx.service.deactivate_pattern(id).await?;
    let patterns = ctx.repositories.patterns().get_pattern(id).await?.into_iter().collect();
    Ok(PatternListing { patterns })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ClubSchedError::InvalidInput(format!("failed to read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        ClubSchedError::InvalidInput(format!("failed to parse {}: {e}", path.display()))
    })
}
