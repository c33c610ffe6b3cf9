// src/config/types.rs
use clap::ValueEnum;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::rank::{RankSettings, MAX_ITERATIONS};

/// How the account weight matrix is adjusted before normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    #[default]
    Plain,
    /// Every account trusts itself with weight one.
    Diagonal,
    /// A reserved account links to every other account.
    PhantomAccount,
}

/// Calculator parameters. Replaced as a whole, never patched.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    #[serde(default = "default_outlink_weight")]
    pub outlink_weight: Decimal,
    #[serde(default = "default_precision")]
    pub rank_calculation_precision: Decimal,
    /// Blocks per decay step.
    #[serde(default = "default_decay_period")]
    pub decay_period: u64,
    #[serde(default = "default_decay_koefficient")]
    pub decay_koefficient: Decimal,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
    #[serde(default)]
    pub stack_contribution: Decimal,
    #[serde(default)]
    pub weight_contribution: Decimal,
    #[serde(default)]
    pub mode: CalculationMode,
    #[serde(default)]
    pub include_detailed_data: bool,
    #[serde(default)]
    pub extended_logging: bool,
    #[serde(default)]
    pub disable_negative_weights: bool,
    #[serde(default = "default_true")]
    pub subtract_stack_after_calculation: bool,
    #[serde(default)]
    pub use_soft_discretization: bool,
    /// Multiple of the average share a trust rank must reach to count as priority.
    #[serde(default = "default_discretization_threshold")]
    pub discretization_threshold: Decimal,
    /// Starting size of every weight matrix dimension.
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    #[serde(default = "default_reserved_account")]
    pub reserved_account: String,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            outlink_weight: default_outlink_weight(),
            rank_calculation_precision: default_precision(),
            decay_period: default_decay_period(),
            decay_koefficient: default_decay_koefficient(),
            num_threads: default_num_threads(),
            stack_contribution: Decimal::ZERO,
            weight_contribution: Decimal::ZERO,
            mode: CalculationMode::Plain,
            include_detailed_data: false,
            extended_logging: false,
            disable_negative_weights: false,
            subtract_stack_after_calculation: true,
            use_soft_discretization: false,
            discretization_threshold: default_discretization_threshold(),
            initial_capacity: default_initial_capacity(),
            reserved_account: default_reserved_account(),
        }
    }
}

impl Parameters {
    /// Solver settings derived from these parameters.
    #[must_use]
    pub fn rank_settings(&self) -> RankSettings {
        RankSettings {
            outlink_weight: self.outlink_weight,
            precision: self.rank_calculation_precision,
            num_threads: self.num_threads,
            max_iterations: MAX_ITERATIONS,
        }
    }
}

fn default_outlink_weight() -> Decimal { dec!(0.7) }
fn default_precision() -> Decimal { dec!(0.01) }
// 24h of 1s blocks
const fn default_decay_period() -> u64 { 86_400 }
fn default_decay_koefficient() -> Decimal { dec!(0.9) }
const fn default_num_threads() -> usize { 1 }
const fn default_true() -> bool { true }
fn default_discretization_threshold() -> Decimal { Decimal::ONE }
const fn default_initial_capacity() -> usize { 16 }
fn default_reserved_account() -> String { "__phantom__".to_string() }
