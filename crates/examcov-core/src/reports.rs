//! Report structs for coverage analysis.
//!
//! These are the record shapes handed to consumers (CLI output, dashboards).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`;
//! persistence beyond these in-memory shapes is the consumer's concern.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::attribution::Attribution;
use crate::metrics::{CoverageMetrics, FrequencyTierReport, SummaryStatistics, WordCount};
use crate::recommend::Recommendation;

/// Full analysis report: overall coverage, per-group breakdown, attribution
/// table, and the overall recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FullAnalysisReport {
    /// Run metadata.
    pub metadata: AnalysisMetadata,
    /// Coverage over the union of every document.
    pub overall: OverallCoverage,
    /// One entry per attribution group, alphabetical by label.
    pub groups: Vec<GroupReport>,
    /// Document → (institution, department) table.
    pub attributions: Vec<Attribution>,
    /// Ranking over the overall coverage.
    pub recommendation: Recommendation,
}

/// Metadata about one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisMetadata {
    /// Loaded word books, in registration order.
    pub books: Vec<String>,
    /// Books that failed to load, with the reason.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable_books: Vec<UnavailableBookReport>,
    /// Number of ingested documents.
    pub documents: usize,
}

/// A word book excluded from the run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UnavailableBookReport {
    /// Book name.
    pub name: String,
    /// Human-readable load failure.
    pub reason: String,
}

/// Coverage of the combined document vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OverallCoverage {
    /// Normalized tokens across all documents, before dedup.
    pub total_tokens: usize,
    /// Distinct canonical words across all documents.
    pub unique_words: usize,
    /// Per-book metrics, in registration order.
    pub per_book: Vec<BookCoverage>,
    /// Most frequent canonical words.
    pub top_words: Vec<WordCount>,
    /// Cross-book averages and best performers, absent when no book loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryStatistics>,
    /// Occurrence-frequency tiers matched against the first registered
    /// book, absent when no book loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_tiers: Option<FrequencyTierReport>,
}

/// Metrics for one book, labeled.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookCoverage {
    /// Book name.
    pub book: String,
    /// The metrics.
    pub metrics: CoverageMetrics,
}

/// Coverage for one attribution group.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GroupReport {
    /// Group label (`institution` or `institution_department`).
    pub group: String,
    /// Institution name.
    pub institution: String,
    /// Department, for department-level groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Documents attributed to this group.
    pub document_ids: Vec<String>,
    /// Normalized tokens in the group, before dedup.
    pub total_tokens: usize,
    /// Distinct canonical words in the group.
    pub unique_words: usize,
    /// Mean extraction confidence over documents that reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_confidence: Option<f64>,
    /// Total pages processed over documents that reported a count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_processed: Option<u32>,
    /// Per-book metrics over the group's unioned vocabulary.
    pub per_book: Vec<BookCoverage>,
    /// Most frequent canonical words in the group.
    pub top_words: Vec<WordCount>,
}
