//! Books command — word-book registry status.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::instrument;

use examcov_core::config::Config;
use examcov_core::registry::Registry;

/// Arguments for the `books` subcommand.
#[derive(Args, Debug)]
pub struct BooksArgs {}

#[derive(Serialize)]
struct BookStatus {
    name: String,
    file: String,
    column: String,
    available: bool,
    words: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Show each configured book, its source, and whether it loaded.
#[instrument(name = "cmd_books", skip_all)]
pub fn cmd_books(_args: BooksArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let registry = Registry::load(&config.books);

    let statuses: Vec<BookStatus> = config
        .books
        .iter()
        .map(|source| {
            let loaded = registry.get(&source.name);
            let error = registry
                .unavailable()
                .iter()
                .find(|book| book.name == source.name)
                .map(|book| book.error.to_string());
            BookStatus {
                name: source.name.clone(),
                file: source.file.clone(),
                column: source.column.clone(),
                available: loaded.is_some(),
                words: loaded.map_or(0, examcov_core::registry::WordBook::len),
                error,
            }
        })
        .collect();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    println!("{}", "Configured word books".bold());
    for status in &statuses {
        if status.available {
            println!(
                "  {} {} — {} words (column '{}' of {})",
                "ok".green(),
                status.name.bold(),
                status.words,
                status.column,
                status.file,
            );
        } else {
            println!(
                "  {} {} — {}",
                "unavailable".yellow(),
                status.name.bold(),
                status.error.as_deref().unwrap_or("unknown error"),
            );
        }
    }
    Ok(())
}
