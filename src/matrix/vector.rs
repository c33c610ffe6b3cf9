// src/matrix/vector.rs
//! Dense vector helpers over `&[Decimal]`.

use rust_decimal::Decimal;

/// `n` entries of `1/n`. Empty for `n == 0`.
#[must_use]
pub fn uniform(n: usize) -> Vec<Decimal> {
    if n == 0 {
        return Vec::new();
    }
    vec![Decimal::ONE / Decimal::from(n); n]
}

#[must_use]
pub fn dot(a: &[Decimal], b: &[Decimal]) -> Decimal {
    a.iter().zip(b).map(|(&x, &y)| x * y).sum()
}

#[must_use]
pub fn norm_1(v: &[Decimal]) -> Decimal {
    v.iter().map(|x| x.abs()).sum()
}

/// `‖a - b‖₁`.
#[must_use]
pub fn l1_distance(a: &[Decimal], b: &[Decimal]) -> Decimal {
    a.iter().zip(b).map(|(&x, &y)| (x - y).abs()).sum()
}

pub fn scale(v: &mut [Decimal], k: Decimal) {
    for x in v {
        *x *= k;
    }
}

/// `acc += k * v`.
pub fn axpy(acc: &mut [Decimal], k: Decimal, v: &[Decimal]) {
    for (a, &x) in acc.iter_mut().zip(v) {
        *a += k * x;
    }
}

/// Scales `v` so its L1 norm is one. Zero vectors are left untouched.
pub fn normalize_l1(v: &mut [Decimal]) {
    let norm = norm_1(v);
    if norm > Decimal::ZERO {
        scale(v, Decimal::ONE / norm);
    }
}
