//! Logging and tracing initialization.
//!
//! Human-readable logs go to stderr; when a log directory is configured
//! (config `log_dir` or `EXAMCOV_LOG_DIR`), JSONL logs are also written via
//! a daily-rolling, non-blocking appender.

use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Resolved observability settings.
#[derive(Debug, Default)]
pub struct ObservabilityConfig {
    /// Directory for JSONL log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Resolve the log directory: `EXAMCOV_LOG_DIR` wins over the config
    /// file value.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let log_dir = std::env::var_os("EXAMCOV_LOG_DIR")
            .map(PathBuf::from)
            .or(config_log_dir);
        Self { log_dir }
    }
}

/// Build the stderr log filter from CLI verbosity flags and the configured
/// default level. `RUST_LOG` wins when set.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => config_level,
            1 => "debug",
            _ => "trace",
        }
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize tracing. Returns the appender guard that must stay alive for
/// the process lifetime when file logging is active.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    if let Some(ref dir) = config.log_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
        let appender = tracing_appender::rolling::daily(dir, "examcov.jsonl");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_filter(EnvFilter::new("debug"));
        tracing_subscriber::registry()
            .with(stderr_layer)
            .with(file_layer)
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry().with(stderr_layer).init();
        Ok(None)
    }
}
