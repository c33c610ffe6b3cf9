// src/utils.rs
use sha2::{Digest, Sha256};

use crate::types::Scores;

/// SHA-256 over a canonical rendering of `scores`.
///
/// Each line is `kind\tname\tscore` with the score normalized (trailing
/// zeros dropped), in map order, so equal results hash equally on every
/// platform.
#[must_use]
pub fn scores_digest(scores: &Scores) -> String {
    let mut hasher = Sha256::new();
    for (kind, map) in scores {
        for (name, score) in map {
            hasher.update(format!("{kind}\t{name}\t{}\n", score.normalize()).as_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}
