// src/cli/mod.rs
//! CLI command handlers.

pub mod args;
pub mod dispatch;
pub mod handlers;
pub mod input;
pub mod reporting;

pub use args::{Cli, Commands};
