//! Holiday lookups and the unknown-status policy

pub mod policy;
pub mod ports;

pub use policy::{apply_fallback, resolve_is_holiday};
pub use ports::{HolidayCalendar, HolidayProvider};
