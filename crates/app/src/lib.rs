//! # clubsched Application
//!
//! Command-line surface and dependency wiring for recurring club event
//! generation. `main.rs` parses arguments, loads configuration and hands off
//! to [`commands::dispatch`].

pub mod cli;
pub mod commands;
pub mod context;
pub mod utils;

pub use cli::{Cli, Command, PatternsCommand};
pub use commands::{dispatch, CommandOutput};
pub use context::AppContext;
