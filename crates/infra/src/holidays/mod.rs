//! Holiday data adapters

pub mod cache;
pub mod client;

pub use cache::{CachedHolidayCalendar, HolidayCacheConfig};
pub use client::{HttpHolidayProvider, StaticHolidayProvider};
