// src/calculator/filter.rs
use crate::types::Relation;

/// Decides whether a relation takes part in the graph.
///
/// Any `Fn(&Relation) -> bool` closure is a filter.
pub trait RelationFilter: Send + Sync {
    fn check(&self, relation: &Relation) -> bool;
}

impl<F> RelationFilter for F
where
    F: Fn(&Relation) -> bool + Send + Sync,
{
    fn check(&self, relation: &Relation) -> bool {
        self(relation)
    }
}

/// Keeps relations at or above a minimum height.
#[derive(Debug, Clone, Copy)]
pub struct MinHeightFilter(pub u64);

impl RelationFilter for MinHeightFilter {
    fn check(&self, relation: &Relation) -> bool {
        relation.height >= self.0
    }
}
