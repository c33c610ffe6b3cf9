// src/rank/pagerank.rs
//! `PageRank` power iteration with teleportation and low-rank corrections.

use std::sync::Arc;

use parking_lot::RwLock;
use rayon::{ThreadPool, ThreadPoolBuilder};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{RankInput, RankRun, RankSettings, RankStrategy, StopReason};
use crate::error::{Result, SocIndexError};
use crate::matrix::{tools, vector, CorrectionMatrix, SparseMatrix};

/// Iterates `r = w·(O·r + Σ C·r) + (1 - w)·t` until successive iterates are
/// closer than the configured precision.
///
/// Matrix-vector products run on a dedicated rayon pool with exactly
/// `num_threads` workers. The pool is rebuilt whenever a call asks for a
/// different size and is only built for more than one thread.
pub struct PageRank {
    workers: RwLock<Workers>,
}

struct Workers {
    size: usize,
    pool: Option<Arc<ThreadPool>>,
}

impl Workers {
    fn build(size: usize) -> Result<Self> {
        let pool = if size > 1 {
            Some(Arc::new(
                ThreadPoolBuilder::new()
                    .num_threads(size)
                    .thread_name(|i| format!("socindex-rank-{i}"))
                    .build()?,
            ))
        } else {
            None
        };
        Ok(Self { size, pool })
    }
}

impl PageRank {
    /// # Errors
    /// Returns an error if the worker pool cannot be created.
    pub fn new(num_threads: usize) -> Result<Self> {
        Ok(Self {
            workers: RwLock::new(Workers::build(num_threads)?),
        })
    }

    /// Single-threaded engine; never fails.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            workers: RwLock::new(Workers { size: 1, pool: None }),
        }
    }

    /// Worker count the engine currently runs with.
    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.workers.read().size
    }

    // The lock is released before the pool is used.
    fn pool_for(&self, num_threads: usize) -> Result<Option<Arc<ThreadPool>>> {
        {
            let workers = self.workers.read();
            if workers.size == num_threads {
                return Ok(workers.pool.clone());
            }
        }
        let mut workers = self.workers.write();
        if workers.size != num_threads {
            *workers = Workers::build(num_threads)?;
            debug!(num_threads, "rank worker pool rebuilt");
        }
        Ok(workers.pool.clone())
    }
}

impl RankStrategy for PageRank {
    fn process(&self, input: &RankInput<'_>, settings: &RankSettings) -> Result<RankRun> {
        validate(input)?;
        match self.pool_for(settings.num_threads)? {
            Some(pool) => pool.install(|| calculate_rank(input, settings)),
            None => calculate_rank(input, settings),
        }
    }

    fn prod(
        &self,
        out: &mut [Decimal],
        m: &SparseMatrix,
        v: &[Decimal],
        settings: &RankSettings,
    ) -> Result<()> {
        match self.pool_for(settings.num_threads)? {
            Some(pool) => pool.install(|| tools::prod(out, m, v, settings.num_threads)),
            None => tools::prod(out, m, v, settings.num_threads),
        }
    }

    fn resize(&self, num_threads: usize) -> Result<()> {
        self.pool_for(num_threads).map(|_| ())
    }
}

fn validate(input: &RankInput<'_>) -> Result<()> {
    let n = input.outlink.size1();
    if !input.outlink.is_square() {
        return Err(SocIndexError::validation(format!(
            "outlink matrix must be square, got {}x{}",
            n,
            input.outlink.size2()
        )));
    }
    if input.initial.len() != n || input.teleport.len() != n {
        return Err(SocIndexError::validation(format!(
            "vector lengths {} / {} do not match matrix dimension {n}",
            input.initial.len(),
            input.teleport.len()
        )));
    }
    if let Some(c) = input
        .corrections
        .iter()
        .find(|c| c.size1() != n || c.size2() != n)
    {
        return Err(SocIndexError::validation(format!(
            "correction matrix {}x{} does not match dimension {n}",
            c.size1(),
            c.size2()
        )));
    }
    Ok(())
}

fn calculate_rank(input: &RankInput<'_>, settings: &RankSettings) -> Result<RankRun> {
    let mut teleportation = input.teleport.to_vec();
    vector::scale(&mut teleportation, Decimal::ONE - settings.outlink_weight);

    let mut current = input.initial.to_vec();
    let mut residuals = Vec::new();
    let mut stop = StopReason::MaxIterationsReached;

    for _ in 0..settings.max_iterations {
        let next = iterate(input.outlink, input.corrections, &current, &teleportation, settings)?;
        let residual = vector::l1_distance(&next, &current);
        residuals.push(residual);
        current = next;
        if residual < settings.precision {
            stop = StopReason::Converged;
            break;
        }
    }

    let iterations = residuals.len();
    match stop {
        StopReason::Converged => debug!(iterations, "rank converged"),
        StopReason::MaxIterationsReached => warn!(
            iterations,
            residual = %residuals.last().copied().unwrap_or_default(),
            "rank stopped at iteration cap"
        ),
    }

    Ok(RankRun {
        scores: current,
        iterations,
        stop,
        residuals,
    })
}

fn iterate(
    outlink: &SparseMatrix,
    corrections: &[CorrectionMatrix],
    previous: &[Decimal],
    teleportation: &[Decimal],
    settings: &RankSettings,
) -> Result<Vec<Decimal>> {
    let mut next = vec![Decimal::ZERO; previous.len()];
    tools::prod(&mut next, outlink, previous, settings.num_threads)?;

    for correction in corrections {
        vector::axpy(&mut next, Decimal::ONE, &correction.prod(previous));
    }

    vector::scale(&mut next, settings.outlink_weight);
    vector::axpy(&mut next, Decimal::ONE, teleportation);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_dangling_only_graph_stays_uniform() {
        let mut o = SparseMatrix::new(4, 4);
        let mut corrections = Vec::new();
        tools::normalize_columns(&mut o, &mut corrections).unwrap();
        let v = vector::uniform(4);
        let input = RankInput {
            outlink: &o,
            initial: &v,
            teleport: &v,
            corrections: &corrections,
        };
        let run = PageRank::sequential()
            .process(&input, &RankSettings::default())
            .unwrap();
        assert!(run.converged());
        assert_eq!(run.scores, vec![dec!(0.25); 4]);
    }

    fn pool_threads(engine: &PageRank) -> Option<usize> {
        engine
            .workers
            .read()
            .pool
            .as_ref()
            .map(|pool| pool.current_num_threads())
    }

    #[test]
    fn test_pool_follows_requested_size() {
        let engine = PageRank::new(1).unwrap();
        assert_eq!(pool_threads(&engine), None);

        engine.resize(4).unwrap();
        assert_eq!(engine.num_threads(), 4);
        assert_eq!(pool_threads(&engine), Some(4));

        let o = SparseMatrix::new(3, 3);
        let v = vector::uniform(3);
        let input = RankInput {
            outlink: &o,
            initial: &v,
            teleport: &v,
            corrections: &[],
        };
        let settings = RankSettings {
            num_threads: 2,
            ..RankSettings::default()
        };
        engine.process(&input, &settings).unwrap();
        assert_eq!(pool_threads(&engine), Some(2));

        engine.resize(1).unwrap();
        assert_eq!(pool_threads(&engine), None);
    }

    #[test]
    fn test_prod_runs_inside_the_pool() {
        let engine = PageRank::new(3).unwrap();
        let mut m = SparseMatrix::new(2, 2);
        m.set(0, 1, dec!(2)).unwrap();
        m.set(1, 0, dec!(3)).unwrap();
        let mut out = vec![Decimal::ZERO; 2];
        let settings = RankSettings {
            num_threads: 3,
            ..RankSettings::default()
        };
        engine.prod(&mut out, &m, &[dec!(1), dec!(10)], &settings).unwrap();
        assert_eq!(out, vec![dec!(20), dec!(3)]);
        assert_eq!(engine.num_threads(), 3);
    }

    #[test]
    fn test_mismatched_vector_is_rejected() {
        let o = SparseMatrix::new(3, 3);
        let v = vector::uniform(2);
        let input = RankInput {
            outlink: &o,
            initial: &v,
            teleport: &v,
            corrections: &[],
        };
        let err = PageRank::sequential().process(&input, &RankSettings::default());
        assert!(matches!(err, Err(SocIndexError::Validation(_))));
    }
}
