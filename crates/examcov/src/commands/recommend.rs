//! Recommend command — rank word books for a selection.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::instrument;

use examcov_core::aggregate::{CompositeReport, Selection};
use examcov_core::config::Config;
use examcov_core::context::AnalysisContext;
use examcov_core::document::load_extraction_file;
use examcov_core::recommend::{Recommendation, recommend};

/// Arguments for the `recommend` subcommand.
#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Extraction-results JSON file to analyze.
    pub file: Utf8PathBuf,

    /// Group to include (repeatable): an institution, or
    /// institution_department.
    #[arg(short, long = "select", value_name = "GROUP")]
    pub select: Vec<String>,
}

#[derive(Serialize)]
struct RecommendOutput {
    composite: CompositeReport,
    recommendation: Recommendation,
}

/// Rank word books over the selected groups.
#[instrument(name = "cmd_recommend", skip_all, fields(file = %args.file))]
pub fn cmd_recommend(args: RecommendArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let documents = load_extraction_file(args.file.as_str())
        .with_context(|| format!("failed to ingest {}", args.file))?;
    let context = AnalysisContext::build(config, documents);

    // No explicit selection analyzes every institution
    let selection = if args.select.is_empty() {
        let institutions: Vec<String> = context
            .attributions()
            .iter()
            .map(|attribution| attribution.institution.clone())
            .collect();
        Selection::new(institutions)
    } else {
        Selection::new(args.select.clone())
    };

    let composite = context
        .composite(&selection)
        .context("failed to aggregate the selection")?;
    let recommendation = recommend(&composite);

    if global_json {
        let output = RecommendOutput {
            composite,
            recommendation,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if composite.no_data {
        println!("{}", "No data for this selection.".yellow());
        return Ok(());
    }

    println!("{} {}", "Selection:".cyan(), composite.groups.join(", "));
    if !composite.subsumed.is_empty() {
        println!(
            "  {} {}",
            "subsumed by institution:".yellow(),
            composite.subsumed.join(", ")
        );
    }
    if !composite.estimated.is_empty() {
        println!(
            "  {} {}",
            "estimated from institution data:".yellow(),
            composite.estimated.join(", ")
        );
    }

    println!("\n  {}", "Ranking:".cyan());
    for entry in &recommendation.ranking {
        println!(
            "    {}. {} — score {:.1} (coverage {:.1}%, precision {:.1}%)",
            entry.rank,
            entry.book.bold(),
            entry.score,
            entry.coverage_rate,
            entry.precision_rate,
        );
    }

    if let Some(ref optimal) = recommendation.optimal_book {
        println!("\n  {} {}", "Optimal word book:".green(), optimal.bold());
    }
    for line in &recommendation.advice {
        println!("    {line}");
    }
    Ok(())
}
