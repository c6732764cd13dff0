//! # clubsched Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Holiday providers (HTTP and static) and the TTL holiday cache
//! - SQLite and in-memory pattern and event repositories
//! - HTTP client with retry and backoff
//! - Configuration loading from environment and files
//! - The cron-driven generation scheduler
//!
//! ## Architecture
//! - Implements traits defined in `clubsched-core`
//! - Contains all "impure" code (network, disk, timers)

pub mod config;
pub mod database;
pub mod errors;
pub mod holidays;
pub mod http;
pub mod memory;
pub mod observability;
pub mod repositories;
pub mod scheduling;

// Re-export commonly used items
pub use database::{DbManager, SqliteEventRepository, SqlitePatternRepository};
pub use errors::InfraError;
pub use holidays::{CachedHolidayCalendar, HolidayCacheConfig, HttpHolidayProvider, StaticHolidayProvider};
pub use http::{HttpClient, HttpClientBuilder};
pub use memory::{InMemoryEventRepository, InMemoryPatternRepository};
pub use observability::metrics::{HolidayCacheMetrics, HolidayCacheStats};
pub use repositories::Repositories;
pub use scheduling::{GenerationScheduler, GenerationSchedulerConfig, SchedulerError};
