//! Analyze command — full coverage analysis over an extraction file.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use examcov_core::config::Config;
use examcov_core::context::AnalysisContext;
use examcov_core::document::load_extraction_file;
use examcov_core::reports::FullAnalysisReport;

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Extraction-results JSON file to analyze.
    pub file: Utf8PathBuf,

    /// Write the full JSON report to this path.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,
}

/// Run full coverage analysis on an extraction file.
#[instrument(name = "cmd_analyze", skip_all, fields(file = %args.file))]
pub fn cmd_analyze(args: AnalyzeArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(file = %args.file, "executing analyze command");

    let documents = load_extraction_file(args.file.as_str())
        .with_context(|| format!("failed to ingest {}", args.file))?;
    let context = AnalysisContext::build(config, documents);
    let report = context.full_report();

    if let Some(ref output) = args.output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(output.as_std_path(), json)
            .with_context(|| format!("failed to write report to {output}"))?;
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&args.file, &report);
    Ok(())
}

/// Text output — section by section.
fn print_report(file: &Utf8PathBuf, report: &FullAnalysisReport) {
    println!("{}", file.bold());

    println!(
        "\n  {} {} documents, {} tokens, {} unique words",
        "Corpus:".cyan(),
        report.metadata.documents,
        report.overall.total_tokens,
        report.overall.unique_words,
    );

    println!("\n  {}", "Word books:".cyan());
    for entry in &report.overall.per_book {
        println!(
            "    {} coverage {:.1}% ({}/{} words), precision {:.1}%",
            entry.book.bold(),
            entry.metrics.coverage_rate,
            entry.metrics.matched_count,
            entry.metrics.book_words,
            entry.metrics.precision_rate,
        );
    }
    for unavailable in &report.metadata.unavailable_books {
        println!(
            "    {} {} — {}",
            unavailable.name.bold(),
            "unavailable".yellow(),
            unavailable.reason,
        );
    }

    if !report.overall.top_words.is_empty() {
        let top: Vec<String> = report
            .overall
            .top_words
            .iter()
            .take(10)
            .map(|entry| format!("{} ({})", entry.word, entry.count))
            .collect();
        println!("\n  {} {}", "Frequent words:".cyan(), top.join(", "));
    }

    println!("\n  {}", "Groups:".cyan());
    for group in &report.groups {
        let best = group
            .per_book
            .iter()
            .max_by(|a, b| {
                a.metrics
                    .coverage_rate
                    .partial_cmp(&b.metrics.coverage_rate)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map_or_else(
                || "no books loaded".to_string(),
                |entry| format!("{} {:.1}%", entry.book, entry.metrics.coverage_rate),
            );
        println!(
            "    {} — {} words ({} unique), best: {}",
            group.group.bold(),
            group.total_tokens,
            group.unique_words,
            best,
        );
    }

    if let Some(ref optimal) = report.recommendation.optimal_book {
        println!("\n  {} {}", "Optimal word book:".green(), optimal.bold());
    }
    for line in &report.recommendation.advice {
        println!("    {line}");
    }
}
