// src/normalization.rs
//! Rescaling of score maps for presentation.

use rust_decimal::Decimal;

use crate::types::ScoreMap;

/// Scales `scores` so their L1 norm is one.
#[must_use]
pub fn scale_to_one(scores: &ScoreMap) -> ScoreMap {
    scale(scores, Decimal::ONE)
}

/// Scales `scores` so their L1 norm equals the number of entries, putting an
/// average node at one.
#[must_use]
pub fn scale_to_node_count(scores: &ScoreMap) -> ScoreMap {
    scale(scores, Decimal::from(scores.len()))
}

/// Scales `scores` so their L1 norm equals `norm`.
///
/// A map whose norm is zero comes back unchanged.
#[must_use]
pub fn scale(scores: &ScoreMap, norm: Decimal) -> ScoreMap {
    let total: Decimal = scores.values().map(|v| v.abs()).sum();
    let Some(k) = norm.checked_div(total) else {
        return scores.clone();
    };
    scores
        .iter()
        .map(|(name, &value)| (name.clone(), value * k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> ScoreMap {
        [("a", dec!(0.5)), ("b", dec!(1.5)), ("c", dec!(2))]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_scale_to_one() {
        let scaled = scale_to_one(&sample());
        assert_eq!(scaled["a"], dec!(0.125));
        assert_eq!(scaled["c"], dec!(0.5));
        assert_eq!(scaled.values().copied().sum::<Decimal>(), Decimal::ONE);
    }

    #[test]
    fn test_scale_to_node_count() {
        let scaled = scale_to_node_count(&sample());
        assert_eq!(scaled["b"], dec!(1.125));
        assert_eq!(scaled.values().copied().sum::<Decimal>(), dec!(3));
    }

    #[test]
    fn test_zero_norm_is_unchanged() {
        let zeros: ScoreMap = [("a".to_string(), Decimal::ZERO)].into_iter().collect();
        assert_eq!(scale(&zeros, dec!(10)), zeros);
    }
}
