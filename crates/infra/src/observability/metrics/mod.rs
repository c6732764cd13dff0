//! In-process counters

pub mod cache;

pub use cache::{HolidayCacheMetrics, HolidayCacheStats};
