// src/types.rs
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Namespace a node name lives in. Account and content ids never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[serde(alias = "ACCOUNT")]
    Account,
    #[serde(alias = "CONTENT")]
    Content,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account => write!(f, "account"),
            Self::Content => write!(f, "content"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    #[serde(alias = "OWNERSHIP")]
    Ownership,
    #[serde(alias = "UPVOTE")]
    Upvote,
    #[serde(alias = "REPOST")]
    Repost,
    #[serde(alias = "TRUST")]
    Trust,
}

impl RelationKind {
    /// Endpoint kinds `(source, target)` a relation of this kind must connect.
    #[must_use]
    pub const fn endpoints(self) -> (NodeKind, NodeKind) {
        match self {
            Self::Ownership | Self::Upvote => (NodeKind::Account, NodeKind::Content),
            Self::Repost => (NodeKind::Content, NodeKind::Content),
            Self::Trust => (NodeKind::Account, NodeKind::Account),
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ownership => "OWNERSHIP",
            Self::Upvote => "UPVOTE",
            Self::Repost => "REPOST",
            Self::Trust => "TRUST",
        };
        f.write_str(name)
    }
}

/// A typed, directed edge between two named nodes observed at a block height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RelationRecord")]
pub struct Relation {
    pub source: String,
    pub source_kind: NodeKind,
    pub target: String,
    pub target_kind: NodeKind,
    pub kind: RelationKind,
    pub height: u64,
    pub decayable: bool,
}

/// Wire form of [`Relation`]; an absent `decayable` follows the relation kind.
#[derive(Deserialize)]
struct RelationRecord {
    source: String,
    source_kind: NodeKind,
    target: String,
    target_kind: NodeKind,
    kind: RelationKind,
    #[serde(default)]
    height: u64,
    decayable: Option<bool>,
}

impl From<RelationRecord> for Relation {
    fn from(r: RelationRecord) -> Self {
        Self {
            decayable: r.decayable.unwrap_or(r.kind == RelationKind::Upvote),
            source: r.source,
            source_kind: r.source_kind,
            target: r.target,
            target_kind: r.target_kind,
            kind: r.kind,
            height: r.height,
        }
    }
}

impl Relation {
    /// Builds a relation with endpoint kinds implied by `kind`.
    #[must_use]
    pub fn new(kind: RelationKind, source: &str, target: &str, height: u64) -> Self {
        let (source_kind, target_kind) = kind.endpoints();
        Self {
            source: source.to_string(),
            source_kind,
            target: target.to_string(),
            target_kind,
            kind,
            height,
            decayable: kind == RelationKind::Upvote,
        }
    }

    #[must_use]
    pub fn ownership(owner: &str, content: &str, height: u64) -> Self {
        Self::new(RelationKind::Ownership, owner, content, height)
    }

    /// An upvote is decayable unless turned off with [`Relation::with_decay`].
    #[must_use]
    pub fn upvote(voter: &str, content: &str, height: u64) -> Self {
        Self::new(RelationKind::Upvote, voter, content, height)
    }

    /// `source` is the reposting content, `target` the original.
    #[must_use]
    pub fn repost(source: &str, target: &str, height: u64) -> Self {
        Self::new(RelationKind::Repost, source, target, height)
    }

    /// `truster` places trust in `trustee`.
    #[must_use]
    pub fn trust(truster: &str, trustee: &str, height: u64) -> Self {
        Self::new(RelationKind::Trust, truster, trustee, height)
    }

    #[must_use]
    pub fn with_decay(mut self, decayable: bool) -> Self {
        self.decayable = decayable;
        self
    }

    /// Returns true if the endpoint kinds agree with the relation kind.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.kind.endpoints() == (self.source_kind, self.target_kind)
    }
}

/// Score per node name.
pub type ScoreMap = BTreeMap<String, Decimal>;

/// Result of one `calculate()` call, keyed by node kind.
pub type Scores = BTreeMap<NodeKind, ScoreMap>;

/// Share of a node's score coming through a single incoming edge:
/// `koefficient * rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub koefficient: Decimal,
    pub rate: Decimal,
}

impl Contribution {
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.koefficient * self.rate
    }
}

/// Contributions into a node, keyed by the contributing account.
pub type ContributionMap = BTreeMap<String, Contribution>;

/// Attribution of every node's score to a base term and per-edge terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Detalization {
    pub normalization_koefficient: Decimal,
    pub base_index: BTreeMap<String, Decimal>,
    pub activity_index_contribution: BTreeMap<String, ContributionMap>,
    pub stack_contribution: BTreeMap<String, ContributionMap>,
}

impl Detalization {
    /// Sum of the base term and all contributions recorded for `name`.
    #[must_use]
    pub fn reconstruct(&self, name: &str) -> Decimal {
        let base = self.base_index.get(name).copied().unwrap_or_default();
        let sum_of = |map: &BTreeMap<String, ContributionMap>| -> Decimal {
            map.get(name)
                .map(|edges| edges.values().map(Contribution::value).sum())
                .unwrap_or_default()
        };
        base + sum_of(&self.activity_index_contribution) + sum_of(&self.stack_contribution)
    }
}

/// Account and content detalization produced by one detailed calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetalizationReport {
    pub accounts: Detalization,
    pub contents: Detalization,
}
