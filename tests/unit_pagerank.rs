// tests/unit_pagerank.rs
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use socindex_core::matrix::{tools, vector, SparseMatrix};
use socindex_core::rank::{
    PageRank, RankInput, RankSettings, RankStrategy, StopReason, MAX_ITERATIONS,
};

/// 0 -> 1 -> 2 -> 0 plus 0 -> 2, column-normalized.
fn cycle() -> SparseMatrix {
    let mut m = SparseMatrix::new(3, 3);
    m.set(1, 0, dec!(0.5)).unwrap();
    m.set(2, 0, dec!(0.5)).unwrap();
    m.set(2, 1, Decimal::ONE).unwrap();
    m.set(0, 2, Decimal::ONE).unwrap();
    m
}

fn settings(precision: Decimal, threads: usize) -> RankSettings {
    RankSettings {
        precision,
        num_threads: threads,
        ..RankSettings::default()
    }
}

#[test]
fn test_residuals_never_grow() {
    let o = cycle();
    let start = vec![Decimal::ONE, Decimal::ZERO, Decimal::ZERO];
    let teleport = vector::uniform(3);
    let input = RankInput {
        outlink: &o,
        initial: &start,
        teleport: &teleport,
        corrections: &[],
    };
    let run = PageRank::sequential()
        .process(&input, &settings(dec!(0.000001), 1))
        .unwrap();

    assert!(run.converged());
    assert!(run.iterations > 1);
    let tolerance = dec!(0.0000000001);
    for pair in run.residuals.windows(2) {
        assert!(pair[1] <= pair[0] + tolerance, "{} after {}", pair[1], pair[0]);
    }
    let total = vector::norm_1(&run.scores);
    assert!((total - Decimal::ONE).abs() < dec!(0.000001), "norm {total}");
}

#[test]
fn test_oscillation_stops_at_cap() {
    let mut o = SparseMatrix::new(2, 2);
    o.set(1, 0, Decimal::ONE).unwrap();
    o.set(0, 1, Decimal::ONE).unwrap();
    let start = vec![Decimal::ONE, Decimal::ZERO];
    let input = RankInput {
        outlink: &o,
        initial: &start,
        teleport: &start,
        corrections: &[],
    };
    let s = RankSettings {
        outlink_weight: Decimal::ONE,
        ..settings(dec!(0.01), 1)
    };
    let run = PageRank::sequential().process(&input, &s).unwrap();

    assert_eq!(run.stop, StopReason::MaxIterationsReached);
    assert_eq!(run.iterations, MAX_ITERATIONS);
    assert_eq!(run.scores.len(), 2);
}

#[test]
fn test_pool_matches_sequential() {
    let mut o = SparseMatrix::new(5, 5);
    o.set(1, 0, Decimal::ONE).unwrap();
    o.set(2, 1, Decimal::ONE).unwrap();
    o.set(0, 3, dec!(3)).unwrap();
    o.set(4, 3, dec!(1)).unwrap();
    let mut corrections = Vec::new();
    tools::normalize_columns(&mut o, &mut corrections).unwrap();
    let v = vector::uniform(5);
    let input = RankInput {
        outlink: &o,
        initial: &v,
        teleport: &v,
        corrections: &corrections,
    };

    let single = PageRank::sequential()
        .process(&input, &settings(dec!(0.0001), 1))
        .unwrap();
    let pooled = PageRank::new(3)
        .unwrap()
        .process(&input, &settings(dec!(0.0001), 3))
        .unwrap();
    assert_eq!(single, pooled);
}
