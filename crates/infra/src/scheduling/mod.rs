//! Scheduling infrastructure for automated generation runs
//!
//! The generation scheduler follows the same runtime rules as every
//! long-lived task in this crate:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Timeout wrapping on all async operations

pub mod error;
pub mod generation_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use generation_scheduler::{current_month_in, GenerationScheduler, GenerationSchedulerConfig};
