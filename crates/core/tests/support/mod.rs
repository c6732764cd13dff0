//! Shared test helpers for `clubsched-core` integration tests.
//!
//! In-memory mocks for every core port plus small fixtures for building
//! patterns, so the tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod calendar;
pub mod fixtures;
pub mod repositories;
