// src/matrix/tools.rs
//! Matrix algorithms used by the rank pipeline.

use std::collections::BTreeMap;
use std::ops::Range;

use rayon::prelude::*;
use rust_decimal::Decimal;

use super::correction::CorrectionMatrix;
use super::sparse::SparseMatrix;
use super::vector;
use crate::error::{Result, SocIndexError};

/// Scales every column of `m` so that its effective sum is one and appends
/// the matching rank-1 correction to `corrections`.
///
/// For column `j` with entry sum `s` and minimum entry `min` (zero when no
/// entry is negative):
/// * `c = -min` if `min < 0`, `c = 1` if `s == 0`, `c = 0` otherwise;
/// * entries are multiplied by `1 / (s + n·c)`;
/// * the correction row gets `c / (s + n·c)`.
///
/// Explicit entries plus `n` copies of the correction then sum to exactly one.
///
/// # Errors
/// Returns an invariant error if a column normalizer is zero.
pub fn normalize_columns(
    m: &mut SparseMatrix,
    corrections: &mut Vec<CorrectionMatrix>,
) -> Result<()> {
    let cols = m.size2();
    let n = Decimal::from(cols);
    let mut sums = vec![Decimal::ZERO; cols];
    let mut mins = vec![Decimal::ZERO; cols];

    for (_, j, value) in m.iter() {
        sums[j] += value;
        if value < mins[j] {
            mins[j] = value;
        }
    }

    let mut scales = Vec::with_capacity(cols);
    let mut outlink = Vec::with_capacity(cols);
    for j in 0..cols {
        let c = if mins[j] < Decimal::ZERO {
            -mins[j]
        } else if sums[j].is_zero() {
            Decimal::ONE
        } else {
            Decimal::ZERO
        };
        let scale = Decimal::ONE
            .checked_div(sums[j] + n * c)
            .ok_or_else(|| SocIndexError::invariant(format!("column {j} has a zero normalizer")))?;
        scales.push(scale);
        outlink.push(c * scale);
    }

    m.map_in_place(|_, j, value| value * scales[j]);
    corrections.push(CorrectionMatrix::uniform(m.size1(), outlink));
    Ok(())
}

/// Splits `range` into at most `parts` contiguous chunks whose lengths
/// differ by at most one. Empty chunks are not produced.
#[must_use]
pub fn split_range(range: Range<usize>, parts: usize) -> Vec<Range<usize>> {
    let len = range.len();
    let parts = parts.clamp(1, len.max(1));
    let base = len / parts;
    let extra = len % parts;

    let mut out = Vec::with_capacity(parts);
    let mut start = range.start;
    for i in 0..parts {
        let size = base + usize::from(i < extra);
        if size == 0 {
            continue;
        }
        out.push(start..start + size);
        start += size;
    }
    out
}

/// `out[i - range.start] = Σ_k m[i,k]·v[k]` for every row `i` in `range`.
pub fn partial_prod(out: &mut [Decimal], m: &SparseMatrix, v: &[Decimal], range: Range<usize>) {
    out.iter_mut().for_each(|x| *x = Decimal::ZERO);
    let offset = range.start;
    for (i, row) in m.rows_in(range) {
        out[i - offset] = row
            .iter()
            .map(|(&k, &value)| value * v.get(k).copied().unwrap_or_default())
            .sum();
    }
}

/// `out = m·v`, with rows split across `threads` rayon tasks.
///
/// Each task owns a disjoint slice of `out`, so the only synchronization is
/// the join at the end. `threads == 1` runs on the calling thread.
///
/// # Errors
/// Returns a validation error on mismatched dimensions.
pub fn prod(out: &mut [Decimal], m: &SparseMatrix, v: &[Decimal], threads: usize) -> Result<()> {
    if out.len() != m.size1() || v.len() != m.size2() {
        return Err(SocIndexError::validation(format!(
            "cannot multiply {}x{} matrix by vector of length {} into {}",
            m.size1(),
            m.size2(),
            v.len(),
            out.len()
        )));
    }

    if threads <= 1 {
        partial_prod(out, m, v, 0..m.size1());
        return Ok(());
    }

    let ranges = split_range(0..m.size1(), threads);
    let mut segments = Vec::with_capacity(ranges.len());
    let mut rest = out;
    for range in ranges {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
        segments.push((range, head));
        rest = tail;
    }

    segments
        .into_par_iter()
        .for_each(|(range, segment)| partial_prod(segment, m, v, range));
    Ok(())
}

/// Sparse `a·b`.
///
/// # Errors
/// Returns an invariant error if the inner dimensions differ.
pub fn matrix_prod(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
    if a.size2() != b.size1() {
        return Err(SocIndexError::invariant(format!(
            "cannot multiply {}x{} by {}x{}",
            a.size1(),
            a.size2(),
            b.size1(),
            b.size2()
        )));
    }

    let mut out = SparseMatrix::new(a.size1(), b.size2());
    for (i, row) in a.rows_in(0..a.size1()) {
        let mut acc: BTreeMap<usize, Decimal> = BTreeMap::new();
        for (&k, &x) in row {
            for (j, y) in b.row(k) {
                *acc.entry(j).or_default() += x * y;
            }
        }
        for (j, value) in acc {
            out.set(i, j, value)?;
        }
    }
    Ok(out)
}

/// Cell-wise `a + b`.
///
/// # Errors
/// Returns an invariant error if the dimensions differ.
pub fn matrix_sum(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
    if (a.size1(), a.size2()) != (b.size1(), b.size2()) {
        return Err(SocIndexError::invariant(format!(
            "cannot add {}x{} and {}x{}",
            a.size1(),
            a.size2(),
            b.size1(),
            b.size2()
        )));
    }
    let mut out = a.clone();
    for (i, j, value) in b.iter() {
        out.add(i, j, value)?;
    }
    Ok(out)
}

/// Max-composition: `out[i,j] = max_k a[i,k]·b[k,j]`, keeping only positive
/// results.
///
/// # Errors
/// Returns an invariant error if the inner dimensions differ.
pub fn max_compose(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
    if a.size2() != b.size1() {
        return Err(SocIndexError::invariant(format!(
            "cannot compose {}x{} with {}x{}",
            a.size1(),
            a.size2(),
            b.size1(),
            b.size2()
        )));
    }

    let mut out = SparseMatrix::new(a.size1(), b.size2());
    for (i, row) in a.rows_in(0..a.size1()) {
        let mut best: BTreeMap<usize, Decimal> = BTreeMap::new();
        for (&k, &x) in row {
            for (j, y) in b.row(k) {
                let candidate = x * y;
                let slot = best.entry(j).or_default();
                if candidate > *slot {
                    *slot = candidate;
                }
            }
        }
        for (j, value) in best {
            if value > Decimal::ZERO {
                out.set(i, j, value)?;
            }
        }
    }
    Ok(out)
}

/// Adds one to every diagonal cell.
///
/// # Errors
/// Returns a validation error for a non-square matrix.
pub fn set_diagonal_elements(m: &mut SparseMatrix) -> Result<()> {
    if !m.is_square() {
        return Err(SocIndexError::validation("A square matrix is expected"));
    }
    for i in 0..m.size1() {
        m.add(i, i, Decimal::ONE)?;
    }
    Ok(())
}

/// Drops every negative cell.
pub fn clamp_negative(m: &mut SparseMatrix) {
    m.map_in_place(|_, _, value| value.max(Decimal::ZERO));
}

/// `1` where `n·v_i ≥ threshold·‖v‖₁`, else `0`.
#[must_use]
pub fn discretize_hard(v: &[Decimal], threshold: Decimal) -> Vec<Decimal> {
    let cutoff = threshold * vector::norm_1(v);
    if cutoff <= Decimal::ZERO {
        return vec![Decimal::ZERO; v.len()];
    }
    let n = Decimal::from(v.len());
    v.iter()
        .map(|&x| if n * x >= cutoff { Decimal::ONE } else { Decimal::ZERO })
        .collect()
}

/// `min(1, n·v_i / (threshold·‖v‖₁))`, clamped at zero.
#[must_use]
pub fn discretize_soft(v: &[Decimal], threshold: Decimal) -> Vec<Decimal> {
    let cutoff = threshold * vector::norm_1(v);
    if cutoff <= Decimal::ZERO {
        return vec![Decimal::ZERO; v.len()];
    }
    let n = Decimal::from(v.len());
    v.iter()
        .map(|&x| (n * x / cutoff).clamp(Decimal::ZERO, Decimal::ONE))
        .collect()
}

/// Effective sum of column `j` of a normalized matrix and its corrections.
#[must_use]
pub fn effective_column_sum(
    m: &SparseMatrix,
    corrections: &[CorrectionMatrix],
    j: usize,
) -> Decimal {
    let explicit: Decimal = m.iter().filter(|&(_, c, _)| c == j).map(|(_, _, v)| v).sum();
    let implicit: Decimal = corrections
        .iter()
        .map(|c| (0..c.size1()).map(|i| c.get(i, j)).sum::<Decimal>())
        .sum();
    explicit + implicit
}
