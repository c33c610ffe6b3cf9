// src/matrix/sparse.rs
//! Growable row-major sparse matrix over [`Decimal`].
//!
//! Only nonzero cells are stored. Writing zero removes the cell, so row
//! iteration visits exactly the nonzero entries in ascending column order.

use std::collections::BTreeMap;
use std::ops::Range;

use rust_decimal::Decimal;

use crate::error::{Result, SocIndexError};

type Row = BTreeMap<usize, Decimal>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseMatrix {
    rows: usize,
    cols: usize,
    data: BTreeMap<usize, Row>,
}

impl SparseMatrix {
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: BTreeMap::new(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn size1(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn size2(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Number of stored (nonzero) cells.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Decimal {
        self.data
            .get(&row)
            .and_then(|r| r.get(&col))
            .copied()
            .unwrap_or_default()
    }

    /// Overwrites a cell. Writing zero clears it.
    ///
    /// # Errors
    /// Returns an invariant error if the cell lies outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: Decimal) -> Result<()> {
        self.check_bounds(row, col)?;
        if value.is_zero() {
            self.clear(row, col);
        } else {
            self.data.entry(row).or_default().insert(col, value);
        }
        Ok(())
    }

    /// Adds `value` to a cell.
    ///
    /// # Errors
    /// Returns an invariant error if the cell lies outside the matrix.
    pub fn add(&mut self, row: usize, col: usize, value: Decimal) -> Result<()> {
        let current = self.get(row, col);
        self.set(row, col, current + value)
    }

    fn clear(&mut self, row: usize, col: usize) {
        if let Some(r) = self.data.get_mut(&row) {
            r.remove(&col);
            if r.is_empty() {
                self.data.remove(&row);
            }
        }
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(SocIndexError::invariant(format!(
                "cell ({row}, {col}) outside {}x{} matrix",
                self.rows, self.cols
            )));
        }
        Ok(())
    }

    /// Changes the dimensions. Cells inside the new bounds are preserved,
    /// cells outside are dropped.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        if rows < self.rows {
            self.data.retain(|&r, _| r < rows);
        }
        if cols < self.cols {
            for row in self.data.values_mut() {
                row.retain(|&c, _| c < cols);
            }
            self.data.retain(|_, row| !row.is_empty());
        }
        self.rows = rows;
        self.cols = cols;
    }

    /// Nonzero cells of one row as `(col, value)`.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, Decimal)> + '_ {
        self.data
            .get(&row)
            .into_iter()
            .flat_map(|r| r.iter().map(|(&c, &v)| (c, v)))
    }

    /// Non-empty rows with index inside `range`, as `(row, col -> value)`.
    pub fn rows_in(
        &self,
        range: Range<usize>,
    ) -> impl Iterator<Item = (usize, &BTreeMap<usize, Decimal>)> + '_ {
        self.data.range(range).map(|(&r, row)| (r, row))
    }

    /// All nonzero cells as `(row, col, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Decimal)> + '_ {
        self.data
            .iter()
            .flat_map(|(&r, row)| row.iter().map(move |(&c, &v)| (r, c, v)))
    }

    /// Rewrites every stored cell in place. Cells mapped to zero are removed.
    pub fn map_in_place<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, Decimal) -> Decimal,
    {
        for (&r, row) in &mut self.data {
            for (&c, value) in row.iter_mut() {
                *value = f(r, c, *value);
            }
            row.retain(|_, v| !v.is_zero());
        }
        self.data.retain(|_, row| !row.is_empty());
    }

    /// Copy of the top-left `rows x cols` block.
    #[must_use]
    pub fn truncated(&self, rows: usize, cols: usize) -> Self {
        let mut out = Self::new(rows, cols);
        for (r, row) in self.data.range(..rows) {
            let kept: Row = row.range(..cols).map(|(&c, &v)| (c, v)).collect();
            if !kept.is_empty() {
                out.data.insert(*r, kept);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_write_clears_cell() {
        let mut m = SparseMatrix::new(2, 2);
        m.set(0, 1, dec!(3)).unwrap();
        assert_eq!(m.nnz(), 1);
        m.set(0, 1, Decimal::ZERO).unwrap();
        assert_eq!(m.nnz(), 0);
        assert_eq!(m.get(0, 1), Decimal::ZERO);
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let mut m = SparseMatrix::new(2, 3);
        assert!(m.set(2, 0, dec!(1)).is_err());
        assert!(m.set(0, 3, dec!(1)).is_err());
    }

    #[test]
    fn test_resize_preserves_contents() {
        let mut m = SparseMatrix::new(2, 2);
        m.set(1, 1, dec!(0.5)).unwrap();
        m.resize(8, 4);
        assert_eq!(m.get(1, 1), dec!(0.5));
        m.set(7, 3, dec!(2)).unwrap();
        m.resize(2, 2);
        assert_eq!(m.nnz(), 1);
        assert_eq!((m.size1(), m.size2()), (2, 2));
    }

    #[test]
    fn test_truncated_drops_outer_cells() {
        let mut m = SparseMatrix::new(4, 4);
        m.set(0, 0, dec!(1)).unwrap();
        m.set(0, 3, dec!(1)).unwrap();
        m.set(3, 0, dec!(1)).unwrap();
        let t = m.truncated(2, 2);
        assert_eq!(t.nnz(), 1);
        assert_eq!(t.get(0, 0), dec!(1));
    }
}
