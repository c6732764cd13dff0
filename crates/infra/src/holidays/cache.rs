//! Per-year holiday table cache
//!
//! One slot per calendar year. Each slot is guarded by an async mutex that
//! is held across fetch-and-store, so concurrent lookups of the same year
//! wait for a single fetch instead of racing their own.
//!
//! # Expiry
//!
//! - **Fresh** (`now < expires_at`): served without I/O
//! - **Missing**: fetched; a failure propagates to the caller
//! - **Expired**: refetched; on failure the stale table keeps being served
//!
//! # Example
//!
//! ```rust,ignore
//! let calendar = CachedHolidayCalendar::new(provider, HolidayCacheConfig::default());
//! let set = calendar.holidays(2024).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clubsched_common::{Clock, SystemClock};
use clubsched_core::{HolidayCalendar, HolidayProvider};
use clubsched_domain::{HolidayConfig, HolidayFetchError, HolidaySet};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::observability::metrics::{HolidayCacheMetrics, HolidayCacheStats};

type Slot = Arc<Mutex<Option<Arc<HolidaySet>>>>;

/// Holiday cache configuration
#[derive(Debug, Clone)]
pub struct HolidayCacheConfig {
    /// How long a fetched table stays fresh
    pub ttl: Duration,
}

impl Default for HolidayCacheConfig {
    fn default() -> Self {
        Self::from(&HolidayConfig::default())
    }
}

impl From<&HolidayConfig> for HolidayCacheConfig {
    fn from(config: &HolidayConfig) -> Self {
        Self { ttl: Duration::from_secs(config.cache_ttl_seconds) }
    }
}

impl HolidayCacheConfig {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Log configuration at startup
    pub fn log_config(&self) {
        tracing::info!(ttl_seconds = self.ttl.as_secs(), "holiday cache configuration loaded");
    }
}

/// `HolidayCalendar` backed by a provider, with per-year TTL caching.
///
/// Generic over `Clock` so expiry can be driven by `MockClock` in tests.
pub struct CachedHolidayCalendar<C: Clock = SystemClock> {
    provider: Arc<dyn HolidayProvider>,
    slots: DashMap<i32, Slot>,
    clock: C,
    config: HolidayCacheConfig,
    metrics: HolidayCacheMetrics,
}

impl CachedHolidayCalendar<SystemClock> {
    pub fn new(provider: Arc<dyn HolidayProvider>, config: HolidayCacheConfig) -> Self {
        config.log_config();
        Self::with_clock(provider, config, SystemClock)
    }
}

impl<C: Clock> CachedHolidayCalendar<C> {
    /// Create a cache with a custom clock (for testing)
    pub fn with_clock(provider: Arc<dyn HolidayProvider>, config: HolidayCacheConfig, clock: C) -> Self {
        Self {
            provider,
            slots: DashMap::new(),
            clock,
            config,
            metrics: HolidayCacheMetrics::new(),
        }
    }

    /// Drop the cached table for `year`; the next lookup fetches again.
    pub fn invalidate(&self, year: i32) {
        if self.slots.remove(&year).is_some() {
            debug!(year, "holiday cache entry invalidated");
        }
    }

    pub fn clear(&self) {
        self.slots.clear();
    }

    pub fn stats(&self) -> HolidayCacheStats {
        self.metrics.snapshot(self.slots.len())
    }

    fn slot(&self, year: i32) -> Slot {
        let entry = self.slots.entry(year).or_default();
        Arc::clone(entry.value())
    }

    fn expiry(&self, fetched_at: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.config.ttl)
            .ok()
            .and_then(|ttl| fetched_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[async_trait]
impl<C: Clock + 'static> HolidayCalendar for CachedHolidayCalendar<C> {
    async fn holidays(&self, year: i32) -> Result<Arc<HolidaySet>, HolidayFetchError> {
        let slot = self.slot(year);
        let mut cached = slot.lock().await;

        if let Some(set) = cached.as_ref() {
            if !set.is_expired(self.clock.now()) {
                self.metrics.record_hit();
                debug!(year, "holiday cache hit");
                return Ok(Arc::clone(set));
            }
        }
        self.metrics.record_miss();
        debug!(year, stale = cached.is_some(), "holiday cache miss");

        match self.provider.fetch_holidays(year).await {
            Ok(holidays) => {
                let fetched_at = self.clock.now();
                let set = Arc::new(HolidaySet::new(year, holidays, fetched_at, self.expiry(fetched_at)));
                *cached = Some(Arc::clone(&set));
                Ok(set)
            }
            Err(err) => {
                self.metrics.record_fetch_failure();
                match cached.as_ref() {
                    Some(stale) => {
                        self.metrics.record_stale_served();
                        warn!(
                            year,
                            error = %err,
                            expired_at = %stale.expires_at(),
                            "holiday refresh failed, serving stale table"
                        );
                        Ok(Arc::clone(stale))
                    }
                    None => Err(err),
                }
            }
        }
    }
}
