// src/calculator/mod.rs
//! Relation ingestion and the two-pass score calculation.
//!
//! Relations are folded into a family of sparse weight matrices as blocks
//! arrive. `calculate()` then derives:
//!
//! 1. a trust rank over the trust matrix, discretized into a priority vector;
//! 2. an account-to-account weight matrix, `max_k ownership[i,k]·vote'[k,j]`
//!    where `vote' = repost·vote + vote`;
//! 3. the account rank over that matrix, blended with uniform, priority and
//!    stake teleportation;
//! 4. content scores as `vote'·account_rank`.
//!
//! The weight lock is held while matrices are read or written, never while
//! the rank strategy iterates. Calls to `calculate()` must be serialized by
//! the caller; `add_block()` may run concurrently with them.

pub mod detalization;
pub mod filter;
pub mod vectors;
pub mod weights;

pub use filter::{MinHeightFilter, RelationFilter};
pub use weights::{WeightKind, WeightMatrices};

use std::collections::BTreeMap;

use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, trace};

use crate::config::{CalculationMode, Parameters};
use crate::decay::DecayManager;
use crate::error::{Result, SocIndexError};
use crate::matrix::{tools, vector, CorrectionMatrix, SparseMatrix};
use crate::rank::{PageRank, RankInput, RankStrategy};
use crate::registry::IdRegistry;
use crate::types::{DetalizationReport, NodeKind, Relation, ScoreMap, Scores};

use self::detalization::DetalizationInput;
use self::vectors::Shares;

pub struct SocialIndexCalculator {
    parameters: RwLock<Parameters>,
    accounts: IdRegistry,
    contents: IdRegistry,
    weights: Mutex<WeightMatrices>,
    stakes: Mutex<BTreeMap<String, Decimal>>,
    detalization: Mutex<Option<DetalizationReport>>,
    filter: Option<Box<dyn RelationFilter>>,
    rank: Box<dyn RankStrategy>,
}

/// A column-normalized matrix with its rank-1 corrections.
struct Outlink {
    matrix: SparseMatrix,
    corrections: Vec<CorrectionMatrix>,
}

impl SocialIndexCalculator {
    /// Builds a calculator with the default `PageRank` strategy.
    ///
    /// # Errors
    /// Returns a validation error for invalid parameters, or a thread pool
    /// error if the solver's workers cannot be started.
    pub fn new(parameters: Parameters) -> Result<Self> {
        parameters.validate()?;
        let rank = PageRank::new(parameters.num_threads)?;
        let calculator = Self {
            accounts: IdRegistry::new(),
            contents: IdRegistry::new(),
            weights: Mutex::new(WeightMatrices::new(parameters.initial_capacity)),
            stakes: Mutex::new(BTreeMap::new()),
            detalization: Mutex::new(None),
            filter: None,
            rank: Box::new(rank),
            parameters: RwLock::new(parameters),
        };
        calculator.register_reserved_account();
        Ok(calculator)
    }

    /// Drops relations the filter rejects before they reach the matrices.
    #[must_use]
    pub fn with_filter(mut self, filter: impl RelationFilter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Swaps the solver. The strategy sees the worker count through
    /// `RankSettings` on every call.
    #[must_use]
    pub fn with_rank_strategy(mut self, rank: impl RankStrategy + 'static) -> Self {
        self.rank = Box::new(rank);
        self
    }

    // Registered at construction (id 0) or when phantom mode is switched on later.
    fn register_reserved_account(&self) {
        let params = self.parameters.read();
        if params.mode == CalculationMode::PhantomAccount {
            self.accounts.get_or_create(&params.reserved_account);
        }
    }

    /// Copy of the parameters in effect.
    #[must_use]
    pub fn parameters(&self) -> Parameters {
        self.parameters.read().clone()
    }

    /// Replaces the whole parameter record. The solver's workers are resized
    /// to the new `num_threads`.
    ///
    /// # Errors
    /// Returns a validation error, or a thread pool error if the new workers
    /// cannot be started; the previous parameters stay in effect.
    pub fn set_parameters(&self, parameters: Parameters) -> Result<()> {
        parameters.validate()?;
        self.rank.resize(parameters.num_threads)?;
        *self.parameters.write() = parameters;
        self.register_reserved_account();
        Ok(())
    }

    /// Replaces the stake map used for the stack vector.
    ///
    /// # Errors
    /// Returns a validation error for a negative stake or a total that does
    /// not fit a `Decimal`; the previous stakes stay in effect.
    pub fn add_stack_vector(&self, stakes: BTreeMap<String, Decimal>) -> Result<()> {
        vectors::validate_stakes(&stakes)?;
        *self.stakes.lock() = stakes;
        Ok(())
    }

    /// Account id of `name`, created when `allow_create` is set.
    pub fn account_id(&self, name: &str, allow_create: bool) -> Option<usize> {
        self.accounts.get_id(name, allow_create)
    }

    /// Content id of `name`, created when `allow_create` is set.
    pub fn content_id(&self, name: &str, allow_create: bool) -> Option<usize> {
        self.contents.get_id(name, allow_create)
    }

    /// Known accounts, the phantom included.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts.count()
    }

    /// Known content items.
    #[must_use]
    pub fn content_count(&self) -> usize {
        self.contents.count()
    }

    /// Blocks added or skipped so far.
    #[must_use]
    pub fn total_handled_blocks(&self) -> u64 {
        self.weights.lock().total_handled_blocks
    }

    /// Copy of one weight matrix as it stands.
    #[must_use]
    pub fn weight_snapshot(&self, kind: WeightKind) -> SparseMatrix {
        self.weights.lock().get(kind).clone()
    }

    /// Breakdown from the last detailed `calculate()`, if any.
    #[must_use]
    pub fn detalization(&self) -> Option<DetalizationReport> {
        self.detalization.lock().clone()
    }

    fn registry(&self, kind: NodeKind) -> &IdRegistry {
        match kind {
            NodeKind::Account => &self.accounts,
            NodeKind::Content => &self.contents,
        }
    }

    /// Assigns ids to every unseen endpoint and returns `(source, target)` ids.
    pub fn collect_accounts(&self, relations: &[Relation]) -> Vec<(usize, usize)> {
        relations
            .iter()
            .map(|r| {
                (
                    self.registry(r.source_kind).get_or_create(&r.source),
                    self.registry(r.target_kind).get_or_create(&r.target),
                )
            })
            .collect()
    }

    /// Ingests one block of relations.
    ///
    /// # Errors
    /// Returns a validation error if any relation's endpoint kinds contradict
    /// its relation kind; nothing from the block is applied in that case.
    pub fn add_block(&self, relations: &[Relation]) -> Result<()> {
        let params = self.parameters();
        let block = self.filter_block(relations);

        if let Some(bad) = block.iter().find(|r| !r.is_well_formed()) {
            return Err(SocIndexError::validation(format!(
                "{} relation {} -> {} connects {} to {}",
                bad.kind, bad.source, bad.target, bad.source_kind, bad.target_kind
            )));
        }

        let decay = DecayManager::new(params.decay_period, params.decay_koefficient);
        let mut weights = self.weights.lock();
        let ids = self.collect_accounts(&block);

        weights.total_handled_blocks += 1;
        weights.adjust_sizes(self.accounts.count(), self.contents.count());

        for (relation, (source, target)) in block.iter().zip(ids) {
            if params.extended_logging {
                trace!(
                    kind = %relation.kind,
                    source = %relation.source,
                    target = %relation.target,
                    height = relation.height,
                    "relation"
                );
            }
            let value = if relation.decayable {
                decay.decay_value(relation.height)
            } else {
                Decimal::ONE
            };
            weights.apply(relation.kind, source, target, value)?;
        }

        debug!(
            relations = block.len(),
            total_blocks = weights.total_handled_blocks,
            "block added"
        );
        Ok(())
    }

    fn filter_block(&self, relations: &[Relation]) -> Vec<Relation> {
        match &self.filter {
            None => relations.to_vec(),
            Some(filter) => relations.iter().filter(|r| filter.check(r)).cloned().collect(),
        }
    }

    /// Advances the block counter without touching the matrices.
    pub fn skip_blocks(&self, count: u64) {
        self.weights.lock().total_handled_blocks += count;
    }

    /// Computes account and content scores for the current graph.
    ///
    /// # Errors
    /// Returns a validation error for a non-square weight matrix in diagonal
    /// mode and an invariant error for inconsistent matrix dimensions.
    pub fn calculate(&self) -> Result<Scores> {
        let params = self.parameters();
        let settings = params.rank_settings();
        let account_names = self.accounts.names();
        let content_names = self.contents.names();
        let n = account_names.len();
        let m = content_names.len();

        if n == 0 {
            return Ok(Scores::new());
        }

        let uniform = vector::uniform(n);
        let stack = vectors::stack_vector(&self.stakes.lock(), &account_names);

        // Trust pass.
        let trust_weights = self.weights.lock().trust.truncated(n, n);
        let trust = outlink_matrix(trust_weights, &params)?;
        let trust_initial = vectors::blend(
            n,
            &[(dec!(0.1), uniform.as_slice()), (dec!(0.9), stack.as_slice())],
        );
        let trust_run = self.rank.process(
            &RankInput {
                outlink: &trust.matrix,
                initial: &trust_initial,
                teleport: &trust_initial,
                corrections: &trust.corrections,
            },
            &settings,
        )?;
        let priority = vectors::priority_vector(&trust_run.scores, &params);
        debug!(iterations = trust_run.iterations, "trust pass done");

        // Authority pass.
        let (votes, mut collapsed) = {
            let weights = self.weights.lock();
            let votes = weights.vote_with_reposts()?;
            let collapsed = tools::max_compose(&weights.ownership, &votes)?;
            (votes, collapsed)
        };

        if params.mode == CalculationMode::Diagonal {
            tools::set_diagonal_elements(&mut collapsed)?;
        }
        let mut weight_matrix = collapsed.truncated(n, n);
        let phantom = self.phantom_id(&params);
        if let Some(id) = phantom {
            add_phantom_account_relations(&mut weight_matrix, id)?;
        }

        let outlink = outlink_matrix(weight_matrix, &params)?;
        let shares = Shares::new(&params, &priority, &stack);
        let initial = vectors::blend(
            n,
            &[
                (shares.uniform, uniform.as_slice()),
                (shares.priority, priority.as_slice()),
                (shares.stack, stack.as_slice()),
            ],
        );
        let run = self.rank.process(
            &RankInput {
                outlink: &outlink.matrix,
                initial: &initial,
                teleport: &initial,
                corrections: &outlink.corrections,
            },
            &settings,
        )?;
        debug!(iterations = run.iterations, "authority pass done");

        let mut account_rank = run.scores;
        if params.subtract_stack_after_calculation {
            vector::axpy(
                &mut account_rank,
                -((Decimal::ONE - params.outlink_weight) * shares.stack),
                &stack,
            );
        }
        vector::normalize_l1(&mut account_rank);

        let mut normalization_koefficient = Decimal::ONE;
        if let Some(id) = phantom {
            if n > 1 {
                if let Some(k) = Decimal::ONE.checked_div(Decimal::ONE - account_rank[id]) {
                    vector::scale(&mut account_rank, k);
                    normalization_koefficient = k;
                }
            }
        }

        // Content scores: one pass, no iteration.
        let mut content = votes.truncated(m, n);
        if params.disable_negative_weights {
            tools::clamp_negative(&mut content);
        }
        let mut content_rank = vec![Decimal::ZERO; m];
        self.rank
            .prod(&mut content_rank, &content, &account_rank, &settings)?;

        let report = params.include_detailed_data.then(|| {
            detalization::calculate(&DetalizationInput {
                outlink: &outlink.matrix,
                content: &content,
                corrections: &outlink.corrections,
                activity_index: &account_rank,
                stack: &stack,
                weight: &initial,
                outlink_weight: params.outlink_weight,
                normalization_koefficient,
                account_names: &account_names,
                content_names: &content_names,
                reserved_account: reserved_name(&params),
            })
        });
        *self.detalization.lock() = report;

        Ok(calculate_score(
            reserved_name(&params),
            (account_names.as_slice(), account_rank.as_slice()),
            (content_names.as_slice(), content_rank.as_slice()),
        ))
    }

    fn phantom_id(&self, params: &Parameters) -> Option<usize> {
        (params.mode == CalculationMode::PhantomAccount)
            .then(|| self.accounts.get_id(&params.reserved_account, false))
            .flatten()
    }
}

/// The reserved name is only hidden while phantom mode is active.
fn reserved_name(params: &Parameters) -> &str {
    if params.mode == CalculationMode::PhantomAccount {
        &params.reserved_account
    } else {
        ""
    }
}

fn outlink_matrix(mut matrix: SparseMatrix, params: &Parameters) -> Result<Outlink> {
    if params.disable_negative_weights {
        tools::clamp_negative(&mut matrix);
    }
    let mut corrections = Vec::new();
    tools::normalize_columns(&mut matrix, &mut corrections)?;
    Ok(Outlink {
        matrix,
        corrections,
    })
}

/// Row `phantom` gets weight one towards every other account.
fn add_phantom_account_relations(m: &mut SparseMatrix, phantom: usize) -> Result<()> {
    for id in (0..m.size2()).filter(|&id| id != phantom) {
        m.set(phantom, id, Decimal::ONE)?;
    }
    Ok(())
}

fn calculate_score(
    reserved: &str,
    (account_names, account_rank): (&[String], &[Decimal]),
    (content_names, content_rank): (&[String], &[Decimal]),
) -> Scores {
    let accounts: ScoreMap = account_names
        .iter()
        .zip(account_rank)
        .filter(|(name, _)| name.as_str() != reserved)
        .map(|(name, &score)| (name.clone(), score))
        .collect();
    let contents: ScoreMap = content_names
        .iter()
        .zip(content_rank)
        .map(|(name, &score)| (name.clone(), score))
        .collect();

    let mut scores = Scores::new();
    scores.insert(NodeKind::Account, accounts);
    scores.insert(NodeKind::Content, contents);
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lopsided() -> SparseMatrix {
        let mut m = SparseMatrix::new(2, 2);
        m.set(0, 0, dec!(-1)).unwrap();
        m.set(1, 0, dec!(3)).unwrap();
        m
    }

    #[test]
    fn test_negative_weights_are_lifted_by_default() {
        let outlink = outlink_matrix(lopsided(), &Parameters::default()).unwrap();
        assert_eq!(outlink.matrix.get(0, 0), dec!(-0.25));
        assert_eq!(outlink.matrix.get(1, 0), dec!(0.75));
        assert_eq!(outlink.corrections[0].get(0, 0), dec!(0.25));
    }

    #[test]
    fn test_negative_weights_can_be_dropped() {
        let params = Parameters {
            disable_negative_weights: true,
            ..Parameters::default()
        };
        let outlink = outlink_matrix(lopsided(), &params).unwrap();
        assert_eq!(outlink.matrix.get(0, 0), Decimal::ZERO);
        assert_eq!(outlink.matrix.get(1, 0), Decimal::ONE);
        let correction = &outlink.corrections[0];
        assert_eq!(correction.get(0, 0), Decimal::ZERO);
        assert_eq!(correction.get(0, 1), dec!(0.5));
    }
}
