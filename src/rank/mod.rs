// src/rank/mod.rs
//! Rank computation over a column-normalized outlink matrix.

pub mod pagerank;

pub use pagerank::PageRank;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::Result;
use crate::matrix::{tools, CorrectionMatrix, SparseMatrix};

/// Hard cap on solver iterations.
pub const MAX_ITERATIONS: usize = 1000;

/// Everything a solver consumes. The outlink matrix must already be
/// column-normalized; the solver never normalizes.
#[derive(Debug, Clone, Copy)]
pub struct RankInput<'a> {
    pub outlink: &'a SparseMatrix,
    pub initial: &'a [Decimal],
    pub teleport: &'a [Decimal],
    pub corrections: &'a [CorrectionMatrix],
}

/// Per-call solver settings taken from the calculator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankSettings {
    /// Weight of the link term against teleportation.
    pub outlink_weight: Decimal,
    /// Stop once successive iterates differ by less than this (L1).
    pub precision: Decimal,
    /// Row partitions per matrix-vector product.
    pub num_threads: usize,
    pub max_iterations: usize,
}

impl Default for RankSettings {
    fn default() -> Self {
        Self {
            outlink_weight: dec!(0.7),
            precision: dec!(0.01),
            num_threads: 1,
            max_iterations: MAX_ITERATIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Converged,
    MaxIterationsReached,
}

/// Outcome of one solve. Both stop reasons carry a usable vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankRun {
    pub scores: Vec<Decimal>,
    pub iterations: usize,
    pub stop: StopReason,
    /// L1 distance between successive iterates, one per iteration.
    pub residuals: Vec<Decimal>,
}

impl RankRun {
    #[must_use]
    pub fn converged(&self) -> bool {
        self.stop == StopReason::Converged
    }
}

/// A rank computation strategy, chosen when the calculator is built.
pub trait RankStrategy: Send + Sync {
    /// Computes the rank vector for `input`.
    ///
    /// # Errors
    /// Returns a validation error when vector lengths do not match the matrix.
    fn process(&self, input: &RankInput<'_>, settings: &RankSettings) -> Result<RankRun>;

    /// `out = m·v` with the strategy's workers.
    ///
    /// # Errors
    /// Returns a validation error on mismatched dimensions.
    fn prod(
        &self,
        out: &mut [Decimal],
        m: &SparseMatrix,
        v: &[Decimal],
        settings: &RankSettings,
    ) -> Result<()> {
        tools::prod(out, m, v, settings.num_threads)
    }

    /// Called when the configured worker count changes.
    ///
    /// # Errors
    /// Returns an error if workers of the new size cannot be started.
    fn resize(&self, _num_threads: usize) -> Result<()> {
        Ok(())
    }
}
