//! Domain types and models

pub mod calendar;
pub mod event;
pub mod holiday;
pub mod pattern;

pub use calendar::{weekday_from_index, weekday_index, TimeOfDay, YearMonth};
pub use event::{instance_id, GeneratedEventInstance};
pub use holiday::{parse_iso_holiday_map, Holiday, HolidayFallback, HolidaySet};
pub use pattern::{EventType, PatternRecord, Recurrence, RecurrenceKind, RecurrencePattern};
