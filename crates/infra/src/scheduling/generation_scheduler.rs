//! Cron-driven generation of upcoming months.
//!
//! Each tick works out "the current month" in the configured time zone and
//! asks the [`GenerationService`] to generate that month plus the following
//! ones. Months fail independently; a failed month is logged and retried on
//! the next tick, which is safe because storing instances is idempotent.
//!
//! Lifecycle rules: join handles are tracked, cancellation is explicit, and
//! every asynchronous operation is wrapped in a timeout.

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clubsched_common::{Clock, SystemClock};
use clubsched_core::{GenerationService, MonthOutcome};
use clubsched_domain::constants::MAX_MONTHS_AHEAD;
use clubsched_domain::{ClubSchedError, Config, YearMonth};
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Configuration for the generation scheduler.
#[derive(Debug, Clone)]
pub struct GenerationSchedulerConfig {
    /// Six-field cron expression (seconds first), evaluated in UTC.
    pub cron_expression: String,
    /// Months generated per tick, current month included.
    pub months_ahead: u32,
    /// Zone that decides which month is current.
    pub time_zone: Tz,
    /// Timeout applied to a single generation run.
    pub job_timeout: Duration,
    /// Timeout for starting the underlying scheduler.
    pub start_timeout: Duration,
    /// Timeout for stopping the scheduler.
    pub stop_timeout: Duration,
    /// Timeout for awaiting the monitor task join handle.
    pub join_timeout: Duration,
}

impl Default for GenerationSchedulerConfig {
    fn default() -> Self {
        Self {
            cron_expression: clubsched_domain::constants::DEFAULT_SCHEDULE_CRON.into(),
            months_ahead: clubsched_domain::constants::DEFAULT_MONTHS_AHEAD,
            time_zone: Tz::UTC,
            job_timeout: Duration::from_secs(clubsched_domain::constants::DEFAULT_JOB_TIMEOUT_SECS),
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
            join_timeout: Duration::from_secs(5),
        }
    }
}

impl GenerationSchedulerConfig {
    /// Build from application configuration, resolving the time zone name.
    pub fn from_config(config: &Config) -> SchedulerResult<Self> {
        let time_zone = Tz::from_str(&config.calendar.time_zone).map_err(|e| {
            SchedulerError::InvalidConfig(format!(
                "unknown time zone '{}': {e}",
                config.calendar.time_zone
            ))
        })?;

        let built = Self {
            cron_expression: config.schedule.cron_expression.clone(),
            months_ahead: config.schedule.months_ahead,
            time_zone,
            job_timeout: Duration::from_secs(config.schedule.job_timeout_seconds),
            ..Default::default()
        };
        built.validate()?;
        Ok(built)
    }

    fn validate(&self) -> SchedulerResult<()> {
        if self.months_ahead == 0 || self.months_ahead > MAX_MONTHS_AHEAD {
            return Err(SchedulerError::InvalidConfig(format!(
                "months_ahead must be between 1 and {MAX_MONTHS_AHEAD}, got {}",
                self.months_ahead
            )));
        }
        if self.cron_expression.trim().is_empty() {
            return Err(SchedulerError::InvalidConfig("cron expression is empty".into()));
        }
        Ok(())
    }
}

/// The calendar month `now` falls in, as seen from `tz`.
pub fn current_month_in(tz: Tz, now: DateTime<Utc>) -> YearMonth {
    YearMonth::of(now.with_timezone(&tz).date_naive())
}

/// Periodic generation scheduler with explicit lifecycle management.
pub struct GenerationScheduler {
    scheduler: Option<JobScheduler>,
    config: GenerationSchedulerConfig,
    monitor_handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
    service: Arc<GenerationService>,
    clock: Arc<dyn Clock>,
}

impl GenerationScheduler {
    pub fn new(
        config: GenerationSchedulerConfig,
        service: Arc<GenerationService>,
    ) -> SchedulerResult<Self> {
        Self::with_clock(config, service, Arc::new(SystemClock))
    }

    /// Create a scheduler whose notion of "now" comes from `clock`.
    pub fn with_clock(
        config: GenerationSchedulerConfig,
        service: Arc<GenerationService>,
        clock: Arc<dyn Clock>,
    ) -> SchedulerResult<Self> {
        config.validate()?;
        Ok(Self {
            scheduler: None,
            config,
            monitor_handle: None,
            cancellation: CancellationToken::new(),
            service,
            clock,
        })
    }

    pub fn config(&self) -> &GenerationSchedulerConfig {
        &self.config
    }

    /// Run one generation pass immediately, outside the cron schedule.
    pub async fn run_once(&self) -> Result<Vec<MonthOutcome>, ClubSchedError> {
        Self::run_generation(
            self.service.clone(),
            self.clock.clone(),
            self.config.time_zone,
            self.config.months_ahead,
        )
        .await
    }

    /// Start the scheduler, spawning the monitoring task.
    #[instrument(skip(self), fields(cron = %self.config.cron_expression))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.cancellation = CancellationToken::new();

        let scheduler_instance = self.build_scheduler().await?;
        let start_timeout = self.config.start_timeout;

        tokio::time::timeout(start_timeout, scheduler_instance.start())
            .await
            .map_err(|_| SchedulerError::Timeout { seconds: start_timeout.as_secs() })?
            .map_err(|e| SchedulerError::StartFailed(e.to_string()))?;

        self.scheduler = Some(scheduler_instance);

        let cancel = self.cancellation.clone();
        let handle = tokio::spawn(async move {
            Self::monitor_task(cancel).await;
        });

        self.monitor_handle = Some(handle);
        info!(
            months_ahead = self.config.months_ahead,
            time_zone = %self.config.time_zone,
            "Generation scheduler started"
        );
        Ok(())
    }

    /// Stop the scheduler and wait for the monitor task to finish.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        self.cancellation.cancel();

        let mut scheduler = match self.scheduler.take() {
            Some(scheduler) => scheduler,
            None => return Err(SchedulerError::NotRunning),
        };

        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, async move { scheduler.shutdown().await })
            .await
            .map_err(|_| SchedulerError::Timeout { seconds: stop_timeout.as_secs() })?
            .map_err(|e| SchedulerError::StopFailed(e.to_string()))?;

        if let Some(handle) = self.monitor_handle.take() {
            let join_timeout = self.config.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|_| SchedulerError::Timeout { seconds: join_timeout.as_secs() })?
                .map_err(|e| SchedulerError::TaskJoinFailed(e.to_string()))?;
        }

        info!("Generation scheduler stopped");
        self.cancellation = CancellationToken::new();
        Ok(())
    }

    /// Returns true when a scheduler instance is active.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    async fn build_scheduler(&self) -> SchedulerResult<JobScheduler> {
        let scheduler =
            JobScheduler::new().await.map_err(|e| SchedulerError::CreationFailed(e.to_string()))?;
        let cron_expr = self.config.cron_expression.clone();
        let service = self.service.clone();
        let clock = self.clock.clone();
        let time_zone = self.config.time_zone;
        let months_ahead = self.config.months_ahead;
        let job_timeout = self.config.job_timeout;

        let job_definition = Job::new_async(cron_expr.as_str(), move |_id, _lock| {
            let service = service.clone();
            let clock = clock.clone();

            Box::pin(async move {
                let started = Instant::now();

                match tokio::time::timeout(
                    job_timeout,
                    Self::run_generation(service, clock, time_zone, months_ahead),
                )
                .await
                {
                    Ok(Ok(outcomes)) => {
                        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
                        debug!(
                            months = outcomes.len(),
                            failed,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "Scheduled generation finished"
                        );
                    }
                    Ok(Err(err)) => {
                        error!(error = %err, "Scheduled generation failed");
                    }
                    Err(_) => {
                        warn!(timeout_secs = job_timeout.as_secs(), "Scheduled generation timed out");
                    }
                }
            })
        })
        .map_err(|e| SchedulerError::JobRegistrationFailed(e.to_string()))?;

        let job_id = job_definition.guid();
        scheduler
            .add(job_definition)
            .await
            .map_err(|e| SchedulerError::JobRegistrationFailed(e.to_string()))?;

        debug!(cron = %self.config.cron_expression, job_id = %job_id, "Registered generation job");
        Ok(scheduler)
    }

    async fn run_generation(
        service: Arc<GenerationService>,
        clock: Arc<dyn Clock>,
        time_zone: Tz,
        months_ahead: u32,
    ) -> Result<Vec<MonthOutcome>, ClubSchedError> {
        let start = current_month_in(time_zone, clock.now());
        info!(%start, months_ahead, "Starting scheduled generation");

        let outcomes = service.generate_ahead(start, months_ahead).await?;

        let mut stored = 0;
        let mut partial = 0;
        for outcome in &outcomes {
            match &outcome.result {
                Ok(generated) => {
                    stored += generated.stored;
                    if !generated.report.is_complete() {
                        partial += 1;
                    }
                }
                Err(err) => {
                    warn!(month = %outcome.month, error = %err, "Month generation failed");
                }
            }
        }

        info!(months = outcomes.len(), stored, partial, "Scheduled generation batch completed");
        Ok(outcomes)
    }

    async fn monitor_task(cancel: CancellationToken) {
        cancel.cancelled().await;
        debug!("Generation scheduler monitor cancelled");
    }
}

impl Drop for GenerationScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("Generation scheduler dropped while running; cancelling monitor task");
            self.cancellation.cancel();
        }
    }
}
