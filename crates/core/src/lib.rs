//! # clubsched Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for holiday data and pattern/event storage
//! - Date arithmetic for weekly and monthly recurrences
//! - The event generator and the generation service
//!
//! ## Architecture Principles
//! - Only depends on `clubsched-domain`
//! - No database or HTTP code
//! - All external dependencies via traits

pub mod holidays;
pub mod recurrence;

pub use holidays::{resolve_is_holiday, HolidayCalendar, HolidayProvider};
pub use recurrence::{
    EventGenerator, EventRepository, GenerationOutcome, GenerationReport, GenerationService,
    MonthOutcome, PartialGenerationWarning, PatternRepository,
};
