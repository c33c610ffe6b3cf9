// src/cli/args.rs
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::CalculationMode;

#[derive(Parser)]
#[command(
    name = "socindex",
    version,
    about = "Reputation scores for a social relation graph"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest relations and print account and content scores
    Calculate(CalculateArgs),
    /// Print the effective parameters as TOML
    Params {
        /// Parameter file (defaults to ./socindex.toml when present)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[allow(clippy::struct_excessive_bools)]
#[derive(clap::Args, Debug, Clone)]
pub struct CalculateArgs {
    /// Relations as JSON Lines, one relation per line
    #[arg(long, value_name = "FILE")]
    pub relations: PathBuf,
    /// Parameter file (defaults to ./socindex.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// JSON object mapping account names to stake amounts
    #[arg(long, value_name = "FILE")]
    pub stakes: Option<PathBuf>,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
    /// Include the per-edge score breakdown
    #[arg(long)]
    pub detailed: bool,
    #[arg(long, value_enum, default_value_t = Scale::Raw)]
    pub scale: Scale,
    /// Overrides `num_threads`
    #[arg(long)]
    pub threads: Option<usize>,
    /// Overrides `mode`
    #[arg(long, value_enum)]
    pub mode: Option<CalculationMode>,
    #[arg(long, short)]
    pub verbose: bool,
}

/// Presentation scaling applied to each score map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Scale {
    #[default]
    Raw,
    One,
    NodeCount,
}
