//! Infrastructure error mapping

pub mod conversions;

pub use conversions::{fetch_failure_from_http, InfraError};
