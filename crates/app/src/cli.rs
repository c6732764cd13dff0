//! Argument definitions for the `clubsched` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Generate recurring club events, skipping public holidays where asked
#[derive(Parser, Debug)]
#[command(name = "clubsched")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file (.toml or .json)
    #[arg(short, long, global = true, env = "CLUBSCHED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Do not contact the holiday service; every year has no holidays
    #[arg(long, global = true)]
    pub offline: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate (and store) the events of one month
    Generate {
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        /// Show what would be generated without storing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Generate the current month and the following ones
    GenerateAhead {
        /// Number of months, current one included (default from config)
        #[arg(long)]
        months: Option<u32>,
    },
    /// Print the public holidays of a year
    Holidays {
        #[arg(long)]
        year: i32,
    },
    /// Manage recurrence patterns
    Patterns {
        #[command(subcommand)]
        action: PatternsCommand,
    },
    /// Run the generation scheduler until interrupted
    Schedule {
        /// Run a single generation pass and exit
        #[arg(long)]
        once: bool,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PatternsCommand {
    /// List stored patterns
    List {
        /// Include deactivated patterns
        #[arg(long)]
        all: bool,
    },
    /// Import patterns from a JSON file holding an array of records
    Import { file: PathBuf },
    /// Replace a pattern with an edited version read from a JSON file
    Revise { id: String, file: PathBuf },
    /// Deactivate a pattern
    Deactivate { id: String },
}
