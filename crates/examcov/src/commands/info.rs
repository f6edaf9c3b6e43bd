//! Info command — package information.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::instrument;

use examcov_core::config::ConfigSources;

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {}

#[derive(Serialize)]
struct InfoOutput<'a> {
    name: &'a str,
    version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
}

/// Show the package name, version, and active configuration file.
#[instrument(name = "cmd_info", skip_all)]
pub fn cmd_info(_args: InfoArgs, global_json: bool, sources: &ConfigSources) -> anyhow::Result<()> {
    let output = InfoOutput {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        config_file: sources.primary_file().map(ToString::to_string),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} {}", output.name.bold(), output.version);
    match &output.config_file {
        Some(path) => println!("  config: {path}"),
        None => println!("  config: defaults (no file found)"),
    }
    Ok(())
}
