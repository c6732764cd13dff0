//! Application context - dependency injection container

use std::sync::Arc;

use clubsched_common::{Clock, SystemClock};
use clubsched_core::{EventGenerator, GenerationService, HolidayProvider};
use clubsched_domain::{Config, Result};
use clubsched_infra::{
    CachedHolidayCalendar, HolidayCacheConfig, HttpHolidayProvider, Repositories,
    StaticHolidayProvider,
};
use tracing::info;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub repositories: Repositories,
    pub calendar: Arc<CachedHolidayCalendar>,
    pub service: Arc<GenerationService>,
    pub clock: Arc<dyn Clock>,
}

impl AppContext {
    /// Wire the context from configuration.
    ///
    /// `offline` swaps the HTTP holiday source for an empty static table.
    pub fn new(config: Config, offline: bool) -> Result<Self> {
        let provider: Arc<dyn HolidayProvider> = if offline {
            info!("offline mode: holiday service disabled");
            Arc::new(StaticHolidayProvider::empty())
        } else {
            Arc::new(HttpHolidayProvider::from_config(&config.holidays)?)
        };
        let repositories = Repositories::open(&config.storage)?;

        Ok(Self::with_parts(config, repositories, provider, Arc::new(SystemClock)))
    }

    /// Wire the context from already-built parts.
    pub fn with_parts(
        config: Config,
        repositories: Repositories,
        provider: Arc<dyn HolidayProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let calendar = Arc::new(CachedHolidayCalendar::new(
            provider,
            HolidayCacheConfig::from(&config.holidays),
        ));
        let generator =
            EventGenerator::new(calendar.clone()).with_fallback(config.holidays.fallback);
        let service = Arc::new(GenerationService::new(
            repositories.patterns(),
            repositories.events(),
            generator,
        ));

        info!(
            backend = %repositories.backend(),
            fallback = %config.holidays.fallback,
            "application context ready"
        );

        Self { config, repositories, calendar, service, clock }
    }
}
