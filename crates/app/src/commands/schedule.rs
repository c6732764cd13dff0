//! `schedule`

use clubsched_domain::{ClubSchedError, Result};
use clubsched_infra::scheduling::{GenerationScheduler, GenerationSchedulerConfig};
use tracing::{info, warn};

use super::generate::AheadSummary;
use crate::context::AppContext;

/// Run the scheduler until Ctrl-C, or a single pass with `once`.
///
/// Returns the pass summary for `once`, `None` after a clean shutdown.
pub async fn run(ctx: &AppContext, once: bool) -> Result<Option<AheadSummary>> {
    let config = GenerationSchedulerConfig::from_config(&ctx.config)?;
    let mut scheduler =
        GenerationScheduler::with_clock(config, ctx.service.clone(), ctx.clock.clone())?;

    if once {
        let outcomes = scheduler.run_once().await?;
        return Ok(Some(AheadSummary::from_outcomes(outcomes)));
    }

    scheduler.start().await?;
    info!(cron = %scheduler.config().cron_expression, "scheduler running; press Ctrl-C to stop");

    let signal = tokio::signal::ctrl_c().await;
    if let Err(err) = &signal {
        warn!(error = %err, "failed to listen for Ctrl-C; stopping scheduler");
    }

    scheduler.stop().await?;
    signal.map_err(|e| ClubSchedError::Internal(format!("signal handler failed: {e}")))?;
    Ok(None)
}
