// src/matrix/correction.rs
//! Rank-1 correction matrices kept as a pair of vectors.

use rust_decimal::Decimal;

use super::vector;

/// The outer product `column * rowᵀ`, never materialized.
///
/// Column normalization emits one of these with an all-ones column: every
/// row receives the same `row · v` mass, which is how dangling and negative
/// columns are spread uniformly without writing `n` cells per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionMatrix {
    column: Vec<Decimal>,
    row: Vec<Decimal>,
}

impl CorrectionMatrix {
    #[must_use]
    pub fn new(column: Vec<Decimal>, row: Vec<Decimal>) -> Self {
        Self { column, row }
    }

    /// All-ones column of length `size` times `row`.
    #[must_use]
    pub fn uniform(size: usize, row: Vec<Decimal>) -> Self {
        Self::new(vec![Decimal::ONE; size], row)
    }

    #[must_use]
    pub fn size1(&self) -> usize {
        self.column.len()
    }

    #[must_use]
    pub fn size2(&self) -> usize {
        self.row.len()
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Decimal {
        match (self.column.get(i), self.row.get(j)) {
            (Some(&u), Some(&w)) => u * w,
            _ => Decimal::ZERO,
        }
    }

    /// The correction row (one entry per column of the normalized matrix).
    #[must_use]
    pub fn row(&self) -> &[Decimal] {
        &self.row
    }

    /// `self * v` in `O(n)`.
    #[must_use]
    pub fn prod(&self, v: &[Decimal]) -> Vec<Decimal> {
        let k = vector::dot(&self.row, v);
        self.column.iter().map(|&u| u * k).collect()
    }
}
