// src/lib.rs
//! Reputation scores for accounts and content in a social relation graph.
//!
//! Relations (ownership, upvotes, reposts, trust) are fed to a
//! [`SocialIndexCalculator`] block by block; `calculate()` runs a trust pass
//! and an authority pass of an iterative rank solver over sparse matrices and
//! returns exact decimal scores.

pub mod calculator;
pub mod cli;
pub mod config;
pub mod decay;
pub mod error;
pub mod exit;
pub mod matrix;
pub mod normalization;
pub mod rank;
pub mod registry;
pub mod types;
pub mod utils;

pub use calculator::SocialIndexCalculator;
pub use config::{CalculationMode, Parameters};
pub use error::{Result, SocIndexError};
pub use types::{NodeKind, Relation, RelationKind, Scores};
