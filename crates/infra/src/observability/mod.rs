//! Observability infrastructure

pub mod metrics;
