// src/calculator/detalization.rs
//! Attribution of computed scores to a base term and per-edge terms.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::matrix::{vector, CorrectionMatrix, SparseMatrix};
use crate::types::{Contribution, Detalization, DetalizationReport};

/// Everything the breakdown reads; all vectors are indexed by account id.
pub struct DetalizationInput<'a> {
    pub outlink: &'a SparseMatrix,
    pub content: &'a SparseMatrix,
    pub corrections: &'a [CorrectionMatrix],
    pub activity_index: &'a [Decimal],
    pub stack: &'a [Decimal],
    /// Initial/teleport vector of the authority pass.
    pub weight: &'a [Decimal],
    pub outlink_weight: Decimal,
    pub normalization_koefficient: Decimal,
    pub account_names: &'a [String],
    pub content_names: &'a [String],
    /// Left out of the account breakdown.
    pub reserved_account: &'a str,
}

/// Builds account and content detalization.
///
/// With no stakes the activity share is one; otherwise activity and stack
/// split the attribution evenly.
#[must_use]
pub fn calculate(input: &DetalizationInput<'_>) -> DetalizationReport {
    let (activity_share, stack_share) = if vector::norm_1(input.stack).is_zero() {
        (Decimal::ONE, Decimal::ZERO)
    } else {
        (dec!(0.5), dec!(0.5))
    };

    let mut accounts = Detalization {
        normalization_koefficient: input.normalization_koefficient,
        ..Detalization::default()
    };
    let mut contents = Detalization {
        normalization_koefficient: input.normalization_koefficient,
        ..Detalization::default()
    };

    let base = base_vector(input, activity_share, stack_share);
    for (id, name) in input.account_names.iter().enumerate() {
        if name != input.reserved_account {
            accounts.base_index.insert(name.clone(), base[id]);
        }
    }

    let accounts_len = input.account_names.len();
    for (i, j, value) in input.outlink.iter() {
        if i >= accounts_len || j >= accounts_len {
            continue;
        }
        let target = &input.account_names[i];
        if target == input.reserved_account {
            continue;
        }
        let source = &input.account_names[j];
        accounts
            .activity_index_contribution
            .entry(target.clone())
            .or_default()
            .insert(
                source.clone(),
                Contribution {
                    koefficient: activity_share * input.outlink_weight * value,
                    rate: input.activity_index[j],
                },
            );
        if stack_share > Decimal::ZERO {
            accounts.stack_contribution.entry(target.clone()).or_default().insert(
                source.clone(),
                Contribution {
                    koefficient: stack_share * value,
                    rate: input.stack[j],
                },
            );
        }
    }

    for (i, j, value) in input.content.iter() {
        if i >= input.content_names.len() || j >= accounts_len {
            continue;
        }
        let target = &input.content_names[i];
        let source = &input.account_names[j];
        contents
            .activity_index_contribution
            .entry(target.clone())
            .or_default()
            .insert(
                source.clone(),
                Contribution {
                    koefficient: activity_share * value,
                    rate: input.activity_index[j],
                },
            );
        if stack_share > Decimal::ZERO {
            contents.stack_contribution.entry(target.clone()).or_default().insert(
                source.clone(),
                Contribution {
                    koefficient: stack_share * value,
                    rate: input.stack[j],
                },
            );
        }
    }

    DetalizationReport { accounts, contents }
}

/// Teleportation plus the uniform correction mass each account receives.
fn base_vector(
    input: &DetalizationInput<'_>,
    activity_share: Decimal,
    stack_share: Decimal,
) -> Vec<Decimal> {
    let mut base = vec![Decimal::ZERO; input.account_names.len()];
    vector::axpy(
        &mut base,
        activity_share * (Decimal::ONE - input.outlink_weight),
        input.weight,
    );
    for correction in input.corrections {
        vector::axpy(
            &mut base,
            activity_share * input.outlink_weight,
            &correction.prod(input.activity_index),
        );
        if stack_share > Decimal::ZERO {
            vector::axpy(&mut base, stack_share, &correction.prod(input.stack));
        }
    }
    base
}
