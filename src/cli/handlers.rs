// src/cli/handlers.rs
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use super::args::{CalculateArgs, Scale};
use super::input;
use super::reporting::{self, ScoreReport};
use crate::calculator::SocialIndexCalculator;
use crate::config::{self, Parameters};
use crate::exit::SocIndexExit;
use crate::normalization;
use crate::types::Scores;

fn resolve_config(path: Option<&Path>) -> Result<Parameters> {
    match path {
        Some(p) => config::io::load(p).with_context(|| format!("loading {}", p.display())),
        None => {
            let default = PathBuf::from(config::CONFIG_FILE);
            config::io::load_or_default(&default)
                .with_context(|| format!("loading {}", default.display()))
        }
    }
}

/// Command-line flags override the file.
fn effective_parameters(args: &CalculateArgs) -> Result<Parameters> {
    let mut params = resolve_config(args.config.as_deref())?;
    if let Some(threads) = args.threads {
        params.num_threads = threads;
    }
    if let Some(mode) = args.mode {
        params.mode = mode;
    }
    if args.detailed {
        params.include_detailed_data = true;
    }
    params.validate()?;
    Ok(params)
}

fn apply_scale(scores: Scores, scale: Scale) -> Scores {
    scores
        .into_iter()
        .map(|(kind, map)| {
            let map = match scale {
                Scale::Raw => map,
                Scale::One => normalization::scale_to_one(&map),
                Scale::NodeCount => normalization::scale_to_node_count(&map),
            };
            (kind, map)
        })
        .collect()
}

/// Handles the calculate command.
///
/// # Errors
/// Returns error if an input file cannot be read or parsed, or if the
/// calculation fails.
pub fn handle_calculate(args: &CalculateArgs) -> Result<SocIndexExit> {
    let params = effective_parameters(args)?;
    let calculator = SocialIndexCalculator::new(params)?;

    if let Some(path) = &args.stakes {
        let stakes = input::load_stakes(path)
            .with_context(|| format!("reading stakes from {}", path.display()))?;
        calculator.add_stack_vector(stakes)?;
    }

    let relations = input::load_relations(&args.relations)
        .with_context(|| format!("reading relations from {}", args.relations.display()))?;
    let blocks = input::group_blocks(relations);
    input::feed(&calculator, &blocks)?;
    info!(
        blocks = calculator.total_handled_blocks(),
        accounts = calculator.account_count(),
        contents = calculator.content_count(),
        "relations ingested"
    );

    let scores = apply_scale(calculator.calculate()?, args.scale);
    let report = ScoreReport::new(&scores, calculator.detalization());
    if args.json {
        reporting::print_json(&report)?;
    } else {
        reporting::print_report(&report)?;
    }
    Ok(SocIndexExit::Success)
}

/// Handles the params command.
///
/// # Errors
/// Returns error if the parameter file cannot be loaded.
pub fn handle_params(path: Option<&Path>) -> Result<SocIndexExit> {
    let params = resolve_config(path)?;
    print!("{}", config::io::to_toml(&params)?);
    Ok(SocIndexExit::Success)
}
