//! The analysis session context.
//!
//! [`AnalysisContext`] holds everything one session loads — word books,
//! documents, attributions — and is immutable afterwards, so any number of
//! consumers can read it concurrently without locking. It replaces hidden
//! module-level caches with an explicit load-once object: loading touches
//! storage exactly once, every later call is an in-memory set operation.

use tracing::info;

use crate::aggregate::{Aggregator, CompositeReport, EstimationBands, Selection};
use crate::attribution::{Attribution, Attributor};
use crate::config::Config;
use crate::document::Document;
use crate::error::AnalysisResult;
use crate::metrics::{frequency_tiers, match_all_books, round2, summarize};
use crate::normalize::Vocabulary;
use crate::recommend::{Recommendation, recommend};
use crate::registry::Registry;
use crate::reports::{
    AnalysisMetadata, BookCoverage, FullAnalysisReport, GroupReport, OverallCoverage,
    UnavailableBookReport,
};

/// How many top words the overall report keeps.
const OVERALL_TOP_WORDS: usize = 50;

/// How many top words each group report keeps.
const GROUP_TOP_WORDS: usize = 20;

/// Immutable session state: loaded books, documents, and their attributions.
#[derive(Debug)]
pub struct AnalysisContext {
    registry: Registry,
    documents: Vec<Document>,
    attributions: Vec<Attribution>,
    bands: EstimationBands,
}

impl AnalysisContext {
    /// Load word books per the config and attribute the given documents.
    ///
    /// The only phase that touches external storage; everything downstream
    /// is pure computation on the result.
    #[tracing::instrument(skip_all, fields(documents = documents.len()))]
    pub fn build(config: &Config, documents: Vec<Document>) -> Self {
        let registry = Registry::load(&config.books);
        let attributor = Attributor::new(config.institution_rules());
        Self::from_parts(registry, documents, &attributor, config.estimation)
    }

    /// Assemble a context from already-loaded parts.
    pub fn from_parts(
        registry: Registry,
        documents: Vec<Document>,
        attributor: &Attributor,
        bands: EstimationBands,
    ) -> Self {
        let attributions = documents
            .iter()
            .map(|doc| attributor.attribute(&doc.id))
            .collect();
        info!(
            books = registry.len(),
            unavailable = registry.unavailable().len(),
            documents = documents.len(),
            "analysis context ready"
        );
        Self {
            registry,
            documents,
            attributions,
            bands,
        }
    }

    /// The loaded word books.
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The ingested documents.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// The attribution table, parallel to [`Self::documents`].
    pub fn attributions(&self) -> &[Attribution] {
        &self.attributions
    }

    /// An aggregator over this context's groups.
    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(&self.registry, &self.documents, &self.attributions, self.bands)
    }

    /// Composite metrics for a selection of groups.
    pub fn composite(&self, selection: &Selection) -> AnalysisResult<CompositeReport> {
        self.aggregator().composite(selection)
    }

    /// Ranking and advice for a selection of groups.
    pub fn recommend(&self, selection: &Selection) -> AnalysisResult<Recommendation> {
        Ok(recommend(&self.composite(selection)?))
    }

    /// The union of every document's vocabulary.
    pub fn overall_vocabulary(&self) -> Vocabulary {
        Vocabulary::union_of(self.documents.iter().map(|doc| &doc.vocabulary))
    }

    /// Build the full report: overall coverage, per-group breakdown,
    /// attribution table, and the overall recommendation.
    #[tracing::instrument(skip_all)]
    pub fn full_report(&self) -> FullAnalysisReport {
        let overall_vocabulary = self.overall_vocabulary();
        let per_book = match_all_books(&self.registry, &overall_vocabulary);
        let summary = summarize(&per_book);
        // Tiers run against the first registered book, the deployment's
        // benchmark list
        let tiers = self
            .registry
            .books()
            .first()
            .map(|book| frequency_tiers(book, &overall_vocabulary));

        let overall = OverallCoverage {
            total_tokens: overall_vocabulary.total_tokens(),
            unique_words: overall_vocabulary.unique_words(),
            per_book: per_book
                .iter()
                .map(|(book, metrics)| BookCoverage {
                    book: book.clone(),
                    metrics: metrics.clone(),
                })
                .collect(),
            top_words: overall_vocabulary
                .top_frequencies(OVERALL_TOP_WORDS)
                .into_iter()
                .map(|(word, count)| crate::metrics::WordCount { word, count })
                .collect(),
            summary,
            frequency_tiers: tiers,
        };

        // Recommendation over the whole corpus: every group participates,
        // which is exactly the selection of all institutions.
        let aggregator = self.aggregator();
        let institutions: Vec<String> = self
            .attributions
            .iter()
            .map(|attribution| attribution.institution.clone())
            .collect();
        let recommendation = aggregator
            .composite(&Selection::new(institutions))
            .map_or_else(
                |_| {
                    recommend(&CompositeReport {
                        no_data: true,
                        groups: Vec::new(),
                        subsumed: Vec::new(),
                        estimated: Vec::new(),
                        total_tokens: 0,
                        per_book: Vec::new(),
                    })
                },
                |composite| recommend(&composite),
            );

        FullAnalysisReport {
            metadata: AnalysisMetadata {
                books: self
                    .registry
                    .books()
                    .iter()
                    .map(|book| book.name.clone())
                    .collect(),
                unavailable_books: self
                    .registry
                    .unavailable()
                    .iter()
                    .map(|book| UnavailableBookReport {
                        name: book.name.clone(),
                        reason: book.error.to_string(),
                    })
                    .collect(),
                documents: self.documents.len(),
            },
            overall,
            groups: self.group_reports(),
            attributions: self.attributions.clone(),
            recommendation,
        }
    }

    /// Per-group reports, alphabetical by group label.
    fn group_reports(&self) -> Vec<GroupReport> {
        use std::collections::BTreeMap;

        struct GroupAccumulator<'a> {
            institution: &'a str,
            department: Option<&'a str>,
            documents: Vec<&'a Document>,
        }

        let mut grouped: BTreeMap<String, GroupAccumulator<'_>> = BTreeMap::new();
        for (document, attribution) in self.documents.iter().zip(&self.attributions) {
            grouped
                .entry(attribution.group_label())
                .or_insert_with(|| GroupAccumulator {
                    institution: &attribution.institution,
                    department: attribution.department.as_deref(),
                    documents: Vec::new(),
                })
                .documents
                .push(document);
        }

        grouped
            .into_iter()
            .map(|(label, group)| {
                let vocabulary =
                    Vocabulary::union_of(group.documents.iter().map(|doc| &doc.vocabulary));
                let confidences: Vec<f64> = group
                    .documents
                    .iter()
                    .filter_map(|doc| doc.confidence)
                    .collect();
                let average_confidence = if confidences.is_empty() {
                    None
                } else {
                    Some(round2(
                        confidences.iter().sum::<f64>() / confidences.len() as f64,
                    ))
                };
                let pages: Vec<u32> = group
                    .documents
                    .iter()
                    .filter_map(|doc| doc.pages_processed)
                    .collect();
                let pages_processed = if pages.is_empty() {
                    None
                } else {
                    Some(pages.iter().sum())
                };

                GroupReport {
                    group: label,
                    institution: group.institution.to_string(),
                    department: group.department.map(ToString::to_string),
                    document_ids: group.documents.iter().map(|doc| doc.id.clone()).collect(),
                    total_tokens: vocabulary.total_tokens(),
                    unique_words: vocabulary.unique_words(),
                    average_confidence,
                    pages_processed,
                    per_book: match_all_books(&self.registry, &vocabulary)
                        .into_iter()
                        .map(|(book, metrics)| BookCoverage { book, metrics })
                        .collect(),
                    top_words: vocabulary
                        .top_frequencies(GROUP_TOP_WORDS)
                        .into_iter()
                        .map(|(word, count)| crate::metrics::WordCount { word, count })
                        .collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::WordBook;

    fn context() -> AnalysisContext {
        let mut registry = Registry::default();
        registry.register(WordBook::from_entries(
            "Test 1900",
            ["cat", "dog", "run", "bird"],
        ));
        let mut doc_a = Document::new(
            "東京大学_2023.pdf",
            &["cat".to_string(), "run".to_string(), "jump".to_string()],
        );
        doc_a.confidence = Some(0.9);
        doc_a.pages_processed = Some(10);
        let mut doc_b = Document::new(
            "京都大学_2023.pdf",
            &["dog".to_string(), "cat".to_string()],
        );
        doc_b.confidence = Some(0.7);
        doc_b.pages_processed = Some(6);
        AnalysisContext::from_parts(
            registry,
            vec![doc_a, doc_b],
            &Attributor::with_default_rules(),
            EstimationBands::default(),
        )
    }

    #[test]
    fn full_report_covers_all_sections() {
        let report = context().full_report();
        assert_eq!(report.metadata.books, ["Test 1900"]);
        assert_eq!(report.metadata.documents, 2);
        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.attributions.len(), 2);
        assert_eq!(report.recommendation.optimal_book.as_deref(), Some("Test 1900"));
        assert!(report.overall.frequency_tiers.is_some());
    }

    #[test]
    fn overall_unions_documents() {
        let report = context().full_report();
        // cat, run, jump, dog — cat deduplicates across documents
        assert_eq!(report.overall.unique_words, 4);
        assert_eq!(report.overall.total_tokens, 5);
        let metrics = &report.overall.per_book[0].metrics;
        assert_eq!(metrics.matched_count, 3);
    }

    #[test]
    fn group_reports_carry_extraction_metadata() {
        let report = context().full_report();
        let tokyo = report
            .groups
            .iter()
            .find(|group| group.group == "東京大学")
            .unwrap();
        assert_eq!(tokyo.average_confidence, Some(0.9));
        assert_eq!(tokyo.pages_processed, Some(10));
        assert_eq!(tokyo.document_ids.len(), 1);
    }

    #[test]
    fn composite_and_recommend_flow_through() {
        let ctx = context();
        let composite = ctx
            .composite(&Selection::new(["東京大学"]))
            .unwrap();
        assert!(!composite.no_data);
        let recommendation = ctx.recommend(&Selection::new(["東京大学"])).unwrap();
        assert_eq!(recommendation.optimal_book.as_deref(), Some("Test 1900"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = context().full_report();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"recommendation\""));
    }
}
