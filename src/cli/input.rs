// src/cli/input.rs
//! Relation and stake files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::calculator::{vectors, SocialIndexCalculator};
use crate::error::{Result, SocIndexError};
use crate::types::Relation;

/// Relations sharing one height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub height: u64,
    pub relations: Vec<Relation>,
}

/// Parses JSON Lines, one relation per line. Blank lines and lines starting
/// with `#` are skipped.
///
/// # Errors
/// Returns a validation error naming the first line that does not parse.
pub fn parse_relations(content: &str) -> Result<Vec<Relation>> {
    let mut relations = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let relation: Relation = serde_json::from_str(line)
            .map_err(|e| SocIndexError::validation(format!("line {}: {e}", index + 1)))?;
        relations.push(relation);
    }
    Ok(relations)
}

/// # Errors
/// Returns an I/O error or a parse error as [`parse_relations`].
pub fn load_relations(path: &Path) -> Result<Vec<Relation>> {
    let content = fs::read_to_string(path).map_err(|e| SocIndexError::io(e, path))?;
    parse_relations(&content)
}

/// Parses a JSON object of account name to stake.
///
/// # Errors
/// Returns a JSON error on malformed input and a validation error for a
/// negative stake or an overflowing total.
pub fn parse_stakes(content: &str) -> Result<BTreeMap<String, Decimal>> {
    let stakes: BTreeMap<String, Decimal> = serde_json::from_str(content)?;
    vectors::validate_stakes(&stakes)?;
    Ok(stakes)
}

/// # Errors
/// Returns an I/O error or a parse error as [`parse_stakes`].
pub fn load_stakes(path: &Path) -> Result<BTreeMap<String, Decimal>> {
    let content = fs::read_to_string(path).map_err(|e| SocIndexError::io(e, path))?;
    parse_stakes(&content)
}

/// Groups relations into blocks by height, ascending. File order is kept
/// within a block.
#[must_use]
pub fn group_blocks(relations: Vec<Relation>) -> Vec<Block> {
    let mut by_height: BTreeMap<u64, Vec<Relation>> = BTreeMap::new();
    for relation in relations {
        by_height.entry(relation.height).or_default().push(relation);
    }
    by_height
        .into_iter()
        .map(|(height, relations)| Block { height, relations })
        .collect()
}

/// Feeds blocks in order, skipping the heights between them.
///
/// # Errors
/// Returns the first error from `add_block`.
pub fn feed(calculator: &SocialIndexCalculator, blocks: &[Block]) -> Result<()> {
    let mut previous: Option<u64> = None;
    for block in blocks {
        if let Some(prev) = previous {
            let gap = block.height.saturating_sub(prev).saturating_sub(1);
            if gap > 0 {
                calculator.skip_blocks(gap);
            }
        }
        calculator.add_block(&block.relations)?;
        previous = Some(block.height);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RelationKind;

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        let text = "# header\n\n{\"source\":\"a\",\"source_kind\":\"account\",\"target\":\"b\",\"target_kind\":\"account\",\"kind\":\"trust\"}\n";
        let relations = parse_relations(text).unwrap();
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].kind, RelationKind::Trust);
        assert_eq!(relations[0].height, 0);
    }

    #[test]
    fn test_bad_line_is_reported() {
        let err = parse_relations("{}\n").unwrap_err();
        assert!(err.to_string().contains("line 1"), "got: {err}");
    }
}
