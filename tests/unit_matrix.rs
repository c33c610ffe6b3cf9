// tests/unit_matrix.rs
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use socindex_core::matrix::{tools, vector, SparseMatrix};
use socindex_core::SocIndexError;

fn sample() -> SparseMatrix {
    let mut m = SparseMatrix::new(3, 3);
    m.set(0, 0, dec!(2)).unwrap();
    m.set(1, 0, dec!(1)).unwrap();
    m.set(2, 0, dec!(1)).unwrap();
    m.set(0, 1, dec!(3)).unwrap();
    m
}

#[test]
fn test_nonnegative_columns_sum_to_one() {
    let mut m = sample();
    let mut corrections = Vec::new();
    tools::normalize_columns(&mut m, &mut corrections).unwrap();
    assert_eq!(m.get(0, 0), dec!(0.5));
    assert_eq!(m.get(1, 0), dec!(0.25));
    assert_eq!(m.get(0, 1), Decimal::ONE);
    for j in 0..2 {
        let sum: Decimal = (0..3).map(|i| m.get(i, j)).sum();
        assert_eq!(sum, Decimal::ONE, "column {j}");
        assert_eq!(corrections[0].row()[j], Decimal::ZERO);
    }
}

#[test]
fn test_empty_column_is_spread_uniformly() {
    let mut m = sample();
    let mut corrections = Vec::new();
    tools::normalize_columns(&mut m, &mut corrections).unwrap();
    assert_eq!(corrections.len(), 1);
    let c = &corrections[0];
    assert_eq!(c.get(0, 2), c.get(2, 2));
    let effective = tools::effective_column_sum(&m, &corrections, 2);
    assert!((effective - Decimal::ONE).abs() < dec!(0.0000000000000000000001), "got {effective}");
}

#[test]
fn test_negative_entries_are_lifted() {
    let mut m = SparseMatrix::new(2, 2);
    m.set(0, 0, dec!(-1)).unwrap();
    m.set(1, 0, dec!(3)).unwrap();
    let mut corrections = Vec::new();
    tools::normalize_columns(&mut m, &mut corrections).unwrap();
    // s = 2, c = 1, scale = 1 / (2 + 2)
    assert_eq!(m.get(0, 0), dec!(-0.25));
    assert_eq!(m.get(1, 0), dec!(0.75));
    assert_eq!(corrections[0].row()[0], dec!(0.25));
    assert_eq!(tools::effective_column_sum(&m, &corrections, 0), Decimal::ONE);
}

#[test]
fn test_threaded_product_matches_sequential() {
    let mut m = SparseMatrix::new(7, 7);
    for i in 0..7u32 {
        for j in 0..7u32 {
            if (i + 2 * j) % 3 == 0 {
                m.set(i as usize, j as usize, Decimal::from(i + j + 1)).unwrap();
            }
        }
    }
    let v: Vec<Decimal> = (1..=7u32).map(Decimal::from).collect();
    let mut single = vec![Decimal::ZERO; 7];
    tools::prod(&mut single, &m, &v, 1).unwrap();
    for threads in [2, 3, 4, 16] {
        let mut multi = vec![Decimal::ZERO; 7];
        tools::prod(&mut multi, &m, &v, threads).unwrap();
        assert_eq!(single, multi, "threads = {threads}");
    }
}

#[test]
fn test_product_rejects_bad_dimensions() {
    let m = SparseMatrix::new(2, 3);
    let mut out = vec![Decimal::ZERO; 2];
    let err = tools::prod(&mut out, &m, &[Decimal::ONE; 2], 2);
    assert!(matches!(err, Err(SocIndexError::Validation(_))));
}

#[test]
fn test_diagonal_needs_square_matrix() {
    let mut square = SparseMatrix::new(3, 3);
    tools::set_diagonal_elements(&mut square).unwrap();
    assert_eq!(square.get(2, 2), Decimal::ONE);
    assert_eq!(square.nnz(), 3);

    let mut wide = SparseMatrix::new(2, 3);
    let err = tools::set_diagonal_elements(&mut wide);
    assert!(matches!(err, Err(SocIndexError::Validation(_))));
}

#[test]
fn test_hard_discretization_threshold() {
    let v = vec![dec!(0.5), dec!(0.3), dec!(0.2)];
    // n·v_i >= t·S with n = 3, S = 1, t = 1
    assert_eq!(tools::discretize_hard(&v, Decimal::ONE), vec![dec!(1), dec!(0), dec!(0)]);
    assert_eq!(tools::discretize_hard(&v, dec!(0.5)), vec![dec!(1), dec!(1), dec!(1)]);
    assert_eq!(tools::discretize_hard(&[Decimal::ZERO; 2], Decimal::ONE), vec![Decimal::ZERO; 2]);
}

#[test]
fn test_soft_discretization_is_clamped() {
    let v = vec![dec!(0.5), dec!(0.25), dec!(0.25)];
    let out = tools::discretize_soft(&v, dec!(2));
    // 3·0.5 / 2 = 0.75, 3·0.25 / 2 = 0.375
    assert_eq!(out, vec![dec!(0.75), dec!(0.375), dec!(0.375)]);
    assert_eq!(tools::discretize_soft(&v, Decimal::ONE)[0], Decimal::ONE);
}

#[test]
fn test_vector_helpers() {
    let mut v = vec![dec!(1), dec!(3)];
    vector::normalize_l1(&mut v);
    assert_eq!(v, vec![dec!(0.25), dec!(0.75)]);
    assert_eq!(vector::l1_distance(&v, &[dec!(0.5), dec!(0.5)]), dec!(0.5));
    assert_eq!(vector::uniform(4), vec![dec!(0.25); 4]);
}
