//! clubsched - recurring club event generator
//!
//! Main entry point for the command-line application.

use anyhow::Context;
use clap::Parser;
use clubsched_app::utils::logging::init_logging;
use clubsched_app::{dispatch, AppContext, Cli};
use clubsched_infra::config;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env before configuration so CLUBSCHED_* values from it apply
    let dotenv = dotenvy::dotenv();

    let config = match &cli.config {
        Some(path) => config::load_with_path(Some(path.clone())),
        None => config::load(),
    }
    .context("failed to load configuration")?;

    init_logging(&config.logging)?;
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) => debug!(error = %e, "no .env file loaded"),
    }

    let ctx = AppContext::new(config, cli.offline).context("failed to initialise")?;
    let output = dispatch(&ctx, cli.command, cli.json).await?;
    println!("{}", output.rendered);

    if output.failed_months > 0 {
        anyhow::bail!("{} month(s) failed to generate", output.failed_months);
    }
    Ok(())
}
