//! # clubsched Domain
//!
//! Business domain types and models for recurring club events.
//!
//! This crate contains:
//! - Recurrence patterns and their validation
//! - Holiday tables and the unknown-holiday fallback policy
//! - Generated event instances with deterministic ids
//! - Domain error types and Result definitions
//! - Configuration structures and defaults
//!
//! ## Architecture
//! - No dependencies on other clubsched crates
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
