// src/cli/dispatch.rs
//! Command dispatch, kept out of the binary.

use anyhow::Result;

use super::args::Commands;
use super::handlers::{handle_calculate, handle_params};
use crate::exit::SocIndexExit;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(command: Commands) -> Result<SocIndexExit> {
    match command {
        Commands::Calculate(args) => handle_calculate(&args),
        Commands::Params { config } => handle_params(config.as_deref()),
    }
}
