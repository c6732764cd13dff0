//! Small utilities shared across clubsched crates.
//!
//! Currently this is the wall-clock abstraction used by the holiday cache and
//! the scheduler so that expiry logic can be driven deterministically in
//! tests.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod time;

pub use time::{Clock, MockClock, SystemClock};
