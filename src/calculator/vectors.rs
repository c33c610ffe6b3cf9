// src/calculator/vectors.rs
//! Teleportation and weighting vectors over account ids.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::config::Parameters;
use crate::error::{Result, SocIndexError};
use crate::matrix::{tools, vector};

/// Total stake, rejecting negative amounts and totals past `Decimal::MAX`.
///
/// # Errors
/// Returns a validation error naming the offending account.
pub fn validate_stakes(stakes: &BTreeMap<String, Decimal>) -> Result<Decimal> {
    let mut total = Decimal::ZERO;
    for (name, &amount) in stakes {
        if amount < Decimal::ZERO {
            return Err(SocIndexError::validation(format!("negative stake for {name}")));
        }
        total = total
            .checked_add(amount)
            .ok_or_else(|| SocIndexError::validation(format!("stake total overflows at {name}")))?;
    }
    Ok(total)
}

/// L1-normalized stake per account id; unknown names are ignored.
#[must_use]
pub fn stack_vector(stakes: &BTreeMap<String, Decimal>, names: &[String]) -> Vec<Decimal> {
    let mut result: Vec<Decimal> = names
        .iter()
        .map(|name| stakes.get(name).copied().unwrap_or_default())
        .collect();
    vector::normalize_l1(&mut result);
    result
}

/// Discretized trust rank, L1-normalized.
#[must_use]
pub fn priority_vector(trust_rank: &[Decimal], params: &Parameters) -> Vec<Decimal> {
    let mut result = if params.use_soft_discretization {
        tools::discretize_soft(trust_rank, params.discretization_threshold)
    } else {
        tools::discretize_hard(trust_rank, params.discretization_threshold)
    };
    vector::normalize_l1(&mut result);
    result
}

/// `Σ share_i · v_i` over vectors of length `n`.
#[must_use]
pub fn blend(n: usize, parts: &[(Decimal, &[Decimal])]) -> Vec<Decimal> {
    let mut result = vec![Decimal::ZERO; n];
    for &(share, v) in parts {
        if !share.is_zero() {
            vector::axpy(&mut result, share, v);
        }
    }
    result
}

/// Shares of the uniform, priority and stack terms in the authority pass.
///
/// A configured share is dropped when its vector is empty; the uniform term
/// takes whatever remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shares {
    pub uniform: Decimal,
    pub priority: Decimal,
    pub stack: Decimal,
}

impl Shares {
    #[must_use]
    pub fn new(params: &Parameters, priority: &[Decimal], stack: &[Decimal]) -> Self {
        let stack_share = if vector::norm_1(stack) > Decimal::ZERO {
            params.stack_contribution
        } else {
            Decimal::ZERO
        };
        let priority_share = if vector::norm_1(priority) > Decimal::ZERO {
            params.weight_contribution
        } else {
            Decimal::ZERO
        };
        Self {
            uniform: Decimal::ONE - stack_share - priority_share,
            priority: priority_share,
            stack: stack_share,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_stack_vector_ignores_unknown_names() {
        let stakes: BTreeMap<String, Decimal> =
            [("a".to_string(), dec!(30)), ("zed".to_string(), dec!(5)), ("b".to_string(), dec!(10))]
                .into_iter()
                .collect();
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(stack_vector(&stakes, &names), vec![dec!(0.75), dec!(0.25), dec!(0)]);
    }

    #[test]
    fn test_stake_total_must_fit() {
        let huge: BTreeMap<String, Decimal> =
            [("a".to_string(), Decimal::MAX), ("b".to_string(), Decimal::MAX)]
                .into_iter()
                .collect();
        assert!(matches!(validate_stakes(&huge), Err(SocIndexError::Validation(_))));

        let fine: BTreeMap<String, Decimal> =
            [("a".to_string(), Decimal::MAX), ("b".to_string(), Decimal::ZERO)]
                .into_iter()
                .collect();
        assert_eq!(validate_stakes(&fine).unwrap(), Decimal::MAX);
    }

    #[test]
    fn test_shares_fall_back_to_uniform() {
        let params = Parameters {
            stack_contribution: dec!(0.3),
            weight_contribution: dec!(0.2),
            ..Parameters::default()
        };
        let empty = vec![Decimal::ZERO; 2];
        let full = vec![dec!(0.5); 2];
        let shares = Shares::new(&params, &empty, &full);
        assert_eq!(shares.uniform, dec!(0.7));
        assert_eq!(shares.priority, Decimal::ZERO);
        assert_eq!(shares.stack, dec!(0.3));
    }
}
