// src/config/mod.rs
//! Calculator parameters and their validation.

pub mod io;
pub mod types;

pub use self::types::{CalculationMode, Parameters};

use rust_decimal::Decimal;

use crate::error::{Result, SocIndexError};

/// Default parameter file name looked up by the CLI.
pub const CONFIG_FILE: &str = "socindex.toml";

impl Parameters {
    /// Validates configuration.
    ///
    /// # Errors
    /// Returns a validation error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: Decimal| -> Result<()> {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(SocIndexError::validation(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
            Ok(())
        };

        unit("outlink_weight", self.outlink_weight)?;
        unit("decay_koefficient", self.decay_koefficient)?;
        unit("stack_contribution", self.stack_contribution)?;
        unit("weight_contribution", self.weight_contribution)?;

        if self.stack_contribution + self.weight_contribution > Decimal::ONE {
            return Err(SocIndexError::validation(
                "stack_contribution + weight_contribution must not exceed 1",
            ));
        }
        if self.rank_calculation_precision <= Decimal::ZERO {
            return Err(SocIndexError::validation("rank_calculation_precision must be positive"));
        }
        if self.discretization_threshold <= Decimal::ZERO {
            return Err(SocIndexError::validation("discretization_threshold must be positive"));
        }
        if self.decay_period == 0 {
            return Err(SocIndexError::validation("decay_period must be at least 1"));
        }
        if self.num_threads == 0 {
            return Err(SocIndexError::validation("num_threads must be at least 1"));
        }
        if self.initial_capacity == 0 {
            return Err(SocIndexError::validation("initial_capacity must be at least 1"));
        }
        if self.reserved_account.is_empty() {
            return Err(SocIndexError::validation("reserved_account must not be empty"));
        }
        Ok(())
    }
}
