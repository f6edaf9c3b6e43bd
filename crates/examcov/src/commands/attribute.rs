//! Attribute command — document → institution/department table.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::instrument;

use examcov_core::attribution::Attributor;
use examcov_core::config::Config;
use examcov_core::document::load_extraction_file;

/// Arguments for the `attribute` subcommand.
#[derive(Args, Debug)]
pub struct AttributeArgs {
    /// Extraction-results JSON file to attribute.
    pub file: Utf8PathBuf,
}

/// Print the attribution table for an extraction file.
#[instrument(name = "cmd_attribute", skip_all, fields(file = %args.file))]
pub fn cmd_attribute(args: AttributeArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let documents = load_extraction_file(args.file.as_str())
        .with_context(|| format!("failed to ingest {}", args.file))?;
    let attributor = Attributor::new(config.institution_rules());

    let attributions: Vec<_> = documents
        .iter()
        .map(|doc| attributor.attribute(&doc.id))
        .collect();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&attributions)?);
        return Ok(());
    }

    println!("{}", args.file.bold());
    for attribution in &attributions {
        let marker = if attribution.classified {
            "ok".green().to_string()
        } else {
            "unmatched".yellow().to_string()
        };
        println!(
            "  {} {} → {}",
            marker,
            attribution.document_id,
            attribution.group_label().bold(),
        );
    }
    Ok(())
}
