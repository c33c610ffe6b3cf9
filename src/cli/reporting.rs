// src/cli/reporting.rs
//! Console and JSON output for computed scores.

use std::fmt::Write;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::types::{DetalizationReport, NodeKind, ScoreMap, Scores};
use crate::utils;

/// Everything `calculate` prints.
#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub accounts: ScoreMap,
    pub contents: ScoreMap,
    pub digest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalization: Option<DetalizationReport>,
}

impl ScoreReport {
    /// The digest is taken over `scores` as given, after any scaling.
    #[must_use]
    pub fn new(scores: &Scores, detalization: Option<DetalizationReport>) -> Self {
        let pick = |kind| scores.get(&kind).cloned().unwrap_or_default();
        Self {
            accounts: pick(NodeKind::Account),
            contents: pick(NodeKind::Content),
            digest: utils::scores_digest(scores),
            detalization,
        }
    }
}

/// Plain-text table, highest score first, ties by name.
///
/// # Errors
/// Returns error if formatting fails.
pub fn format_table(title: &str, scores: &ScoreMap) -> Result<String> {
    let mut rows: Vec<(&String, &rust_decimal::Decimal)> = scores.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0).max(4);

    let mut out = String::new();
    writeln!(out, "{title} ({})", rows.len())?;
    for (name, score) in rows {
        writeln!(out, "  {name:<width$}  {}", score.round_dp(12).normalize())?;
    }
    Ok(out)
}

/// Prints both tables, the optional breakdown and the digest.
///
/// # Errors
/// Returns error if formatting fails.
pub fn print_report(report: &ScoreReport) -> Result<()> {
    print!("{}", format_table("ACCOUNTS", &report.accounts)?.cyan());
    println!();
    print!("{}", format_table("CONTENTS", &report.contents)?.cyan());

    if let Some(detail) = &report.detalization {
        println!();
        println!("{}", "BREAKDOWN".yellow().bold());
        print_breakdown(&report.accounts, detail);
    }

    println!();
    println!("{} {}", "digest:".dimmed(), report.digest.bold());
    Ok(())
}

fn print_breakdown(accounts: &ScoreMap, detail: &DetalizationReport) {
    let d = &detail.accounts;
    for name in accounts.keys() {
        let base = d.base_index.get(name).copied().unwrap_or_default();
        println!(
            "  {} base {} reconstructed {}",
            name.bold(),
            base.round_dp(12).normalize(),
            d.reconstruct(name).round_dp(12).normalize()
        );
        if let Some(edges) = d.activity_index_contribution.get(name) {
            for (source, c) in edges {
                println!(
                    "    {} {source} {}",
                    "<-".blue(),
                    c.value().round_dp(12).normalize()
                );
            }
        }
    }
}

/// Prints a serializable object as JSON to stdout.
///
/// # Errors
/// Returns error if serialization fails.
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_table_orders_by_score() {
        let scores: ScoreMap = [("b", dec!(0.25)), ("a", dec!(0.25)), ("c", dec!(0.5))]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let table = format_table("ACCOUNTS", &scores).unwrap();
        let names: Vec<&str> = table
            .lines()
            .skip(1)
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert!(table.starts_with("ACCOUNTS (3)"));
    }
}
