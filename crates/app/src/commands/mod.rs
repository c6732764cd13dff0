//! Command handlers
//!
//! Each handler returns a serialisable summary; [`dispatch`] renders it as
//! text or JSON.

pub mod generate;
pub mod holidays;
pub mod patterns;
pub mod schedule;

use std::fmt::Display;
use std::time::Instant;

use clubsched_domain::{ClubSchedError, Result, YearMonth};
use serde::Serialize;

use crate::cli::{Command, PatternsCommand};
use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Rendered command result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub rendered: String,
    /// Months of a multi-month run that failed; the process should exit
    /// non-zero when this is positive.
    pub failed_months: usize,
}

impl CommandOutput {
    fn ok(rendered: String) -> Self {
        Self { rendered, failed_months: 0 }
    }
}

/// Run `command` against `ctx`.
pub async fn dispatch(ctx: &AppContext, command: Command, json: bool) -> Result<CommandOutput> {
    let name = command_name(&command);
    let started = Instant::now();
    let result = run(ctx, command, json).await;
    log_command_execution(name, started.elapsed(), result.as_ref().err());
    result
}

async fn run(ctx: &AppContext, command: Command, json: bool) -> Result<CommandOutput> {
    match command {
        Command::Generate { year, month, dry_run } => {
            let month = YearMonth::new(year, month)?;
            let summary = generate::generate(ctx, month, dry_run).await?;
            render(&summary, json).map(CommandOutput::ok)
        }
        Command::GenerateAhead { months } => {
            let summary = generate::generate_ahead(ctx, months).await?;
            let failed_months = summary.failed_months();
            Ok(CommandOutput { rendered: render(&summary, json)?, failed_months })
        }
        Command::Holidays { year } => {
            let listing = holidays::list(ctx, year).await?;
            render(&listing, json).map(CommandOutput::ok)
        }
        Command::Patterns { action } => {
            let listing = match action {
                PatternsCommand::List { all } => patterns::list(ctx, all).await?,
                PatternsCommand::Import { file } => patterns::import(ctx, &file).await?,
                PatternsCommand::Revise { id, file } => patterns::revise(ctx, &id, &file).await?,
                PatternsCommand::Deactivate { id } => patterns::deactivate(ctx, &id).await?,
            };
            render(&listing, json).map(CommandOutput::ok)
        }
        Command::Schedule { once } => {
            let summary = schedule::run(ctx, once).await?;
            let failed_months = summary.as_ref().map_or(0, |s| s.failed_months());
            let rendered = match summary {
                Some(summary) => render(&summary, json)?,
                None => "scheduler stopped".to_string(),
            };
            Ok(CommandOutput { rendered, failed_months })
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Generate { dry_run: true, .. } => "generate::dry_run",
        Command::Generate { .. } => "generate",
        Command::GenerateAhead { .. } => "generate_ahead",
        Command::Holidays { .. } => "holidays",
        Command::Patterns { action: PatternsCommand::List { .. } } => "patterns::list",
        Command::Patterns { action: PatternsCommand::Import { .. } } => "patterns::import",
        Command::Patterns { action: PatternsCommand::Revise { .. } } => "patterns::revise",
        Command::Patterns { action: PatternsCommand::Deactivate { .. } } => "patterns::deactivate",
        Command::Schedule { .. } => "schedule",
    }
}

fn render<T: Serialize + Display>(value: &T, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(value)
            .map_err(|e| ClubSchedError::Internal(format!("failed to encode output: {e}")))
    } else {
        Ok(value.to_string())
    }
}
