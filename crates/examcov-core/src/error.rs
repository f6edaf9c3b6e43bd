//! Error types for examcov-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Why a single word book could not be loaded.
///
/// Fatal to that book only: the registry records the book as unavailable and
/// the run continues with the remaining books.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The source file could not be read.
    #[error("cannot read word book file {path}: {source}")]
    Read {
        /// Path of the missing or unreadable file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The source table has no column with the configured name.
    #[error("word book table {path} has no '{column}' column")]
    MissingColumn {
        /// Path of the table.
        path: String,
        /// The column the book's configuration designates.
        column: String,
    },

    /// A row could not be parsed.
    #[error("malformed row in word book table {path}: {source}")]
    Parse {
        /// Path of the table.
        path: String,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// The table parsed but yielded no usable words.
    #[error("word book table {path} contains no usable entries")]
    Empty {
        /// Path of the table.
        path: String,
    },
}

/// Errors that can occur during coverage analysis.
///
/// Empty documents and empty selections are not errors: they degrade to
/// zero/`no_data` results.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A selection names a group absent from the attribution table.
    #[error("unknown group: {name}. Known: {available}")]
    UnknownGroup {
        /// The group label that was requested.
        name: String,
        /// Comma-separated list of known group labels.
        available: String,
    },
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur while ingesting extraction results.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The extraction file could not be read.
    #[error("cannot read extraction file {path}: {source}")]
    Read {
        /// Path of the extraction file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The extraction JSON could not be parsed.
    #[error("malformed extraction JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The JSON parsed but matches neither known extraction format.
    #[error("unrecognized extraction format (expected keyed or extracted_data layout)")]
    UnknownFormat,
}

/// Result type alias using [`IngestError`].
pub type IngestResult<T> = Result<T, IngestError>;
