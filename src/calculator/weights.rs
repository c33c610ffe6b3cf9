// src/calculator/weights.rs
//! The running weight matrices, one per relation family.

use rust_decimal::Decimal;

use crate::error::Result;
use crate::matrix::{tools, SparseMatrix};
use crate::types::RelationKind;

/// Selects one matrix of the weight family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightKind {
    /// accounts x contents
    Ownership,
    /// contents x accounts
    Vote,
    /// contents x contents
    Repost,
    /// accounts x accounts
    Trust,
    /// contents x contents; grown with the others, no relation writes it yet
    Comment,
}

/// Container for the matrices guarded by the calculator's weight lock.
#[derive(Debug, Clone)]
pub struct WeightMatrices {
    pub ownership: SparseMatrix,
    pub vote: SparseMatrix,
    pub repost: SparseMatrix,
    pub trust: SparseMatrix,
    pub comment: SparseMatrix,
    pub total_handled_blocks: u64,
}

impl WeightMatrices {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let square = || SparseMatrix::new(capacity, capacity);
        Self {
            ownership: square(),
            vote: square(),
            repost: square(),
            trust: square(),
            comment: square(),
            total_handled_blocks: 0,
        }
    }

    #[must_use]
    pub fn get(&self, kind: WeightKind) -> &SparseMatrix {
        match kind {
            WeightKind::Ownership => &self.ownership,
            WeightKind::Vote => &self.vote,
            WeightKind::Repost => &self.repost,
            WeightKind::Trust => &self.trust,
            WeightKind::Comment => &self.comment,
        }
    }

    /// Grows every matrix so it covers `accounts` and `contents` ids.
    pub fn adjust_sizes(&mut self, accounts: usize, contents: usize) {
        grow(&mut self.vote, contents, accounts);
        grow(&mut self.ownership, accounts, contents);
        grow(&mut self.repost, contents, contents);
        grow(&mut self.comment, contents, contents);
        grow(&mut self.trust, accounts, accounts);
    }

    /// Records one relation between resolved ids. Last write wins per cell.
    ///
    /// # Errors
    /// Returns an invariant error if an id lies outside its matrix.
    pub fn apply(
        &mut self,
        kind: RelationKind,
        source: usize,
        target: usize,
        value: Decimal,
    ) -> Result<()> {
        match kind {
            RelationKind::Ownership => self.ownership.set(source, target, Decimal::ONE),
            RelationKind::Upvote => self.vote.set(target, source, value),
            RelationKind::Repost => {
                self.repost.set(target, source, Decimal::ONE)?;
                // Cancels the reposting item's own votes so they count once,
                // through the original.
                self.repost.set(source, source, Decimal::NEGATIVE_ONE)
            }
            RelationKind::Trust => self.trust.set(target, source, Decimal::ONE),
        }
    }

    /// `repost · vote + vote`: upvotes propagated through repost chains.
    ///
    /// # Errors
    /// Returns an invariant error on inconsistent dimensions.
    pub fn vote_with_reposts(&self) -> Result<SparseMatrix> {
        let propagated = tools::matrix_prod(&self.repost, &self.vote)?;
        tools::matrix_sum(&propagated, &self.vote)
    }
}

/// Doubles `current` until it reaches `needed`.
#[must_use]
pub fn doubled(current: usize, needed: usize) -> usize {
    let mut size = current.max(1);
    while size < needed {
        size *= 2;
    }
    size
}

fn grow(m: &mut SparseMatrix, rows: usize, cols: usize) {
    if m.size1() < rows || m.size2() < cols {
        let new_rows = doubled(m.size1(), rows);
        let new_cols = doubled(m.size2(), cols);
        m.resize(new_rows, new_cols);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_doubling_covers_counts() {
        assert_eq!(doubled(4, 3), 4);
        assert_eq!(doubled(4, 5), 8);
        assert_eq!(doubled(4, 33), 64);
        assert_eq!(doubled(0, 3), 4);
    }

    #[test]
    fn test_growth_keeps_cells() {
        let mut w = WeightMatrices::new(2);
        w.apply(RelationKind::Trust, 0, 1, Decimal::ONE).unwrap();
        w.adjust_sizes(5, 1);
        assert_eq!((w.trust.size1(), w.trust.size2()), (8, 8));
        assert_eq!((w.vote.size1(), w.vote.size2()), (2, 8));
        assert_eq!(w.trust.get(1, 0), Decimal::ONE);
    }

    #[test]
    fn test_repost_moves_votes_to_original() {
        let mut w = WeightMatrices::new(2);
        // content 1 reposts content 0; account 0 upvotes the repost
        w.apply(RelationKind::Repost, 1, 0, Decimal::ONE).unwrap();
        w.apply(RelationKind::Upvote, 0, 1, dec!(1)).unwrap();
        let v = w.vote_with_reposts().unwrap();
        assert_eq!(v.get(0, 0), dec!(1));
        assert_eq!(v.get(1, 0), Decimal::ZERO);
    }
}
