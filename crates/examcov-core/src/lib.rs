//! Core library for examcov.
//!
//! Measures how well fixed vocabulary lists ("word books") explain the
//! English words appearing in university entrance-exam text. Collaborators
//! hand this crate already-extracted word lists and word-book tables; it
//! hands back computed metrics. Extraction, OCR correction, and report
//! rendering live elsewhere.
//!
//! # Modules
//!
//! - [`normalize`] / [`lemma`] / [`dictionaries`] - Token normalization into canonical words
//! - [`registry`] - Word-book loading with per-book failure tolerance
//! - [`metrics`] - Coverage metrics between vocabularies and books
//! - [`attribution`] - Document → institution/department classification
//! - [`aggregate`] - Selection composites with overlap elimination
//! - [`recommend`] - Word-book ranking and advice
//! - [`context`] - The immutable per-session analysis context
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use examcov_core::context::AnalysisContext;
//! use examcov_core::document::Document;
//! use examcov_core::attribution::Attributor;
//! use examcov_core::aggregate::EstimationBands;
//! use examcov_core::registry::{Registry, WordBook};
//!
//! let mut registry = Registry::default();
//! registry.register(WordBook::from_entries("Target 1900", ["cat", "dog", "run"]));
//!
//! let words = vec!["cats".to_string(), "running".to_string(), "jumped".to_string()];
//! let documents = vec![Document::new("東京大学_2024_英語.pdf", &words)];
//!
//! let context = AnalysisContext::from_parts(
//!     registry,
//!     documents,
//!     &Attributor::with_default_rules(),
//!     EstimationBands::default(),
//! );
//! let report = context.full_report();
//! assert_eq!(report.overall.per_book[0].metrics.matched_count, 2);
//! ```
#![deny(unsafe_code)]

pub mod aggregate;
pub mod attribution;
pub mod config;
pub mod context;
pub mod dictionaries;
pub mod document;
pub mod error;
pub mod lemma;
pub mod metrics;
pub mod normalize;
pub mod recommend;
pub mod registry;
pub mod reports;

pub use config::{Config, ConfigLoader, LogLevel};

pub use error::{AnalysisError, ConfigError, ConfigResult, IngestError, RegistryError};
