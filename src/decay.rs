// src/decay.rs
//! Height-based decay of relation weights.

use rust_decimal::Decimal;

/// Maps a block height to `koefficient ^ floor(height / period)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecayManager {
    period: u64,
    koefficient: Decimal,
}

impl DecayManager {
    /// A zero `period` is treated as one block.
    #[must_use]
    pub fn new(period: u64, koefficient: Decimal) -> Self {
        Self {
            period: period.max(1),
            koefficient,
        }
    }

    /// Decay factor for a relation recorded at `height`.
    #[must_use]
    pub fn decay_value(&self, height: u64) -> Decimal {
        let mut periods = height / self.period;
        let mut base = self.koefficient;
        let mut result = Decimal::ONE;

        // Square-and-multiply; stops early once the result underflows to zero.
        while periods > 0 && !result.is_zero() {
            if periods & 1 == 1 {
                result *= base;
            }
            periods >>= 1;
            if periods > 0 {
                base *= base;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decay_at_zero_is_one() {
        let d = DecayManager::new(100, dec!(0.9));
        assert_eq!(d.decay_value(0), Decimal::ONE);
        assert_eq!(d.decay_value(99), Decimal::ONE);
    }

    #[test]
    fn test_decay_steps_per_period() {
        let d = DecayManager::new(100, dec!(0.9));
        assert_eq!(d.decay_value(100), dec!(0.9));
        assert_eq!(d.decay_value(250), dec!(0.81));
        assert_eq!(d.decay_value(300), dec!(0.729));
    }
}
