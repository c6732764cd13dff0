//! Holiday cache counters
//!
//! Plain atomic counters; no locking needed. SeqCst keeps the derived hit
//! rate consistent with the individual counts.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

/// Counters for the holiday calendar cache
#[derive(Debug, Default)]
pub struct HolidayCacheMetrics {
    hits: AtomicUsize,
    misses: AtomicUsize,
    stale_served: AtomicUsize,
    fetch_failures: AtomicUsize,
}

/// Point-in-time copy of [`HolidayCacheMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HolidayCacheStats {
    pub cached_years: usize,
    pub hits: usize,
    pub misses: usize,
    pub stale_served: usize,
    pub fetch_failures: usize,
}

impl HolidayCacheStats {
    /// Hit rate as a percentage (0.0 to 100.0); 0.0 when nothing was recorded.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        (self.hits as f64 / total as f64) * 100.0
    }
}

impl HolidayCacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh entry served without I/O.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }

    /// Missing or expired entry, a fetch follows.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::SeqCst);
    }

    /// Expired entry served because the refresh failed.
    pub fn record_stale_served(&self) {
        self.stale_served.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self, cached_years: usize) -> HolidayCacheStats {
        HolidayCacheStats {
            cached_years,
            hits: self.hits.load(Ordering::SeqCst),
            misses: self.misses.load(Ordering::SeqCst),
            stale_served: self.stale_served.load(Ordering::SeqCst),
            fetch_failures: self.fetch_failures.load(Ordering::SeqCst),
        }
    }
}
