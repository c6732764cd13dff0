//! Recurrence evaluation and generation orchestration

pub mod dates;
pub mod generator;
pub mod ports;
pub mod service;

pub use dates::{expand_dates, nth_weekday_of_month};
pub use generator::{EventGenerator, GenerationReport, PartialGenerationWarning};
pub use ports::{EventRepository, PatternRepository};
pub use service::{GenerationOutcome, GenerationService, MonthOutcome};
