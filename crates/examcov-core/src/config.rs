//! Configuration loading and discovery.
//!
//! This module provides configuration file discovery by:
//! 1. Walking up from the current directory to find project config
//! 2. Loading user config from the XDG config directory
//! 3. Merging with built-in defaults
//!
//! # Supported formats
//!
//! - TOML (`.toml`)
//! - YAML (`.yaml`, `.yml`)
//! - JSON (`.json`)
//!
//! # Config file locations (in order of precedence, highest first):
//! - `examcov.<ext>` in current directory or any parent
//! - `.examcov.<ext>` in current directory or any parent
//! - `~/.config/examcov/config.<ext>` (user config)
//!
//! When multiple files exist in the same directory, all are merged via
//! figment. Later extensions override earlier: toml < yaml < yml < json.
//! `EXAMCOV_`-prefixed environment variables override everything.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use examcov_core::config::{Config, ConfigLoader};
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! println!("{} word books configured", config.books.len());
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::aggregate::EstimationBands;
use crate::attribution::{InstitutionRule, default_rules};
use crate::error::{ConfigError, ConfigResult};
use crate::registry::BookSource;

/// The configuration for examcov.
///
/// Deserialized from config files found during discovery (TOML, YAML, or
/// JSON) and overridable via `EXAMCOV_` environment variables.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files (falls back to platform defaults if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// Word-book source tables. Each book names the column holding its
    /// vocabulary, since publishers ship different schemas.
    pub books: Vec<BookSource>,
    /// Institution attribution rules, evaluated in order. Omit to use the
    /// built-in table.
    pub institutions: Option<Vec<InstitutionRule>>,
    /// Scaling bands for synthetic department estimates.
    pub estimation: EstimationBands,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_dir: None,
            books: default_books(),
            institutions: None,
            estimation: EstimationBands::default(),
        }
    }
}

impl Config {
    /// The institution rules to use: configured, or the built-in table.
    pub fn institution_rules(&self) -> Vec<InstitutionRule> {
        self.institutions.clone().unwrap_or_else(default_rules)
    }
}

/// The default word-book table of the original deployment.
///
/// Column names differ per book; that heterogeneity is an external fact of
/// the source tables, not something to normalize away here.
pub fn default_books() -> Vec<BookSource> {
    let table = [
        ("Target 1900", "target1900.csv", "word"),
        ("Target 1400", "target1400.csv", "単語"),
        ("システム英単語", "システム英単語.csv", "英語"),
        ("LEAP", "LEAP.csv", "英語"),
        ("鉄壁", "鉄壁.csv", "英語"),
    ];
    table
        .iter()
        .map(|(name, file, column)| BookSource {
            name: (*name).to_string(),
            file: (*file).to_string(),
            column: (*column).to_string(),
        })
        .collect()
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Metadata about which configuration sources were loaded.
///
/// Returned alongside [`Config`] from [`ConfigLoader::load()`] so commands
/// can report the actual config files without re-discovering them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files found by walking up, ordered low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file from XDG config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files loaded (e.g., from `--config` flag).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "examcov";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Starting directory for project config search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include user config from XDG directory.
    include_user_config: bool,
    /// Stop searching when we hit a directory containing this file/dir.
    boundary_marker: Option<String>,
    /// Explicit config files to load (for testing or programmatic use).
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    ///
    /// The loader will walk up from this directory looking for config files.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/examcov/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Add an explicit config file to load.
    ///
    /// Files are loaded in order, with later files taking precedence.
    /// Explicit files are loaded after discovered files.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    ///
    /// Precedence (highest to lowest):
    /// 1. `EXAMCOV_` environment variables
    /// 2. Explicit files (in order added via `with_file`)
    /// 3. Project config (closest to search root)
    /// 4. User config (`~/.config/examcov/config.<ext>`)
    /// 5. Default values
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        // Start with user config (lowest precedence of file sources)
        if self.include_user_config
            && let Some(user_config) = Self::find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        // Add project configs (ordered low→high precedence)
        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        // Add explicit files
        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // Environment variables (highest precedence)
        // EXAMCOV_LOG_LEVEL=debug, etc.
        figment = figment.merge(Env::prefixed("EXAMCOV_").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            books = config.books.len(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Find project config files by walking up from the given directory.
    ///
    /// Returns all matching config files from the closest directory that has
    /// any match, ordered low-to-high precedence: dotfiles before regular
    /// files.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let mut found = Vec::new();

            // Dotfiles first (lower precedence), figment merges last-wins
            for ext in CONFIG_EXTENSIONS {
                let dotfile = dir.join(format!(".{APP_NAME}.{ext}"));
                if dotfile.is_file() {
                    found.push(dotfile);
                }
            }
            for ext in CONFIG_EXTENSIONS {
                let regular = dir.join(format!("{APP_NAME}.{ext}"));
                if regular.is_file() {
                    found.push(regular);
                }
            }

            if !found.is_empty() {
                return found;
            }

            // Check for boundary marker AFTER checking config files,
            // so a config in the same directory as the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    /// Find user config in XDG config directory.
    fn find_user_config() -> Option<Utf8PathBuf> {
        let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
        let config_dir = proj_dirs.config_dir();

        for ext in CONFIG_EXTENSIONS {
            let config_path = config_dir.join(format!("config.{ext}"));
            if config_path.is_file() {
                return Utf8PathBuf::from_path_buf(config_path).ok();
            }
        }

        None
    }

    /// Merge a config file into the figment, detecting format from extension.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// Get the user data local directory for log files.
///
/// Returns `~/.local/share/examcov/` on Linux and equivalent elsewhere.
pub fn user_data_local_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(proj_dirs.data_local_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn utf8_path(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn default_config_carries_five_books() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.books.len(), 5);
        assert_eq!(config.books[0].name, "Target 1900");
        assert_eq!(config.books[0].column, "word");
        // per-book column heterogeneity is preserved
        assert_eq!(config.books[1].column, "単語");
        assert!(config.institutions.is_none());
        assert!(!config.institution_rules().is_empty());
    }

    #[test]
    fn default_bands_match_deployment() {
        let config = Config::default();
        assert_eq!(config.estimation.coverage_low, 0.70);
        assert_eq!(config.estimation.precision_high, 1.20);
    }

    #[test]
    fn project_toml_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("examcov.toml"),
            r#"
log_level = "debug"

[[books]]
name = "Mini"
file = "mini.csv"
column = "word"

[estimation]
coverage_low = 0.5
"#,
        )
        .unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_project_search(utf8_path(&dir))
            .load()
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.books.len(), 1);
        assert_eq!(config.books[0].name, "Mini");
        assert_eq!(config.estimation.coverage_low, 0.5);
        // untouched band fields keep their defaults
        assert_eq!(config.estimation.precision_high, 1.20);
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn yaml_config_loads() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".examcov.yaml"),
            "log_level: warn\nbooks:\n  - name: Y\n    file: y.csv\n    column: english\n",
        )
        .unwrap();

        let (config, _) = ConfigLoader::new()
            .with_user_config(false)
            .with_project_search(utf8_path(&dir))
            .load()
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.books[0].column, "english");
    }

    #[test]
    fn explicit_file_wins_over_project() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("examcov.toml"), "log_level = \"warn\"\n").unwrap();
        let explicit = dir.path().join("special.toml");
        fs::write(&explicit, "log_level = \"error\"\n").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_project_search(utf8_path(&dir))
            .with_file(Utf8PathBuf::from_path_buf(explicit).unwrap())
            .load()
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(
            sources.primary_file().unwrap().file_name(),
            Some("special.toml")
        );
    }

    #[test]
    fn institution_rules_configurable() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("examcov.toml"),
            r#"
[[institutions]]
name = "Test University"
patterns = ["testuniv"]

[[institutions.departments]]
name = "Law"
patterns = ["law"]
"#,
        )
        .unwrap();

        let (config, _) = ConfigLoader::new()
            .with_user_config(false)
            .with_project_search(utf8_path(&dir))
            .load()
            .unwrap();
        let rules = config.institution_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "Test University");
        assert_eq!(rules[0].departments[0].name, "Law");
    }

    #[test]
    fn missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_project_search(utf8_path(&dir))
            .load()
            .unwrap();
        assert_eq!(config, Config::default());
        assert!(sources.primary_file().is_none());
    }
}
