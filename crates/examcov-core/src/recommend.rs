//! Word-book ranking and recommendation.
//!
//! Scores every available book over a selection's composite metrics and
//! produces an ordered ranking plus threshold-based study advice. Books the
//! registry marked unavailable never reach this module; they are absent from
//! the composite input.

use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::aggregate::CompositeReport;
use crate::metrics::round2;

/// Weight of the coverage rate in the ranking score.
const COVERAGE_WEIGHT: f64 = 0.7;

/// Weight of the precision rate in the ranking score.
const PRECISION_WEIGHT: f64 = 0.3;

/// Coverage below this reads as weak for the benchmark book.
const LOW_COVERAGE: f64 = 20.0;

/// Coverage below this reads as moderate for the benchmark book.
const MEDIUM_COVERAGE: f64 = 40.0;

/// Coverage above this counts a book as a strong fit.
const STRONG_FIT_COVERAGE: f64 = 25.0;

/// One entry of the ranking.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RankedBook {
    /// Position in the ranking, 1-based.
    pub rank: usize,
    /// Book name.
    pub book: String,
    /// Weighted score.
    pub score: f64,
    /// Composite coverage rate, percent.
    pub coverage_rate: f64,
    /// Composite precision rate, percent.
    pub precision_rate: f64,
}

/// Ranking and advice for one selection.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Recommendation {
    /// Books ordered by descending score; ties keep registration order.
    pub ranking: Vec<RankedBook>,
    /// The top-ranked book, when any data exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimal_book: Option<String>,
    /// Human-readable study advice.
    pub advice: Vec<String>,
}

/// Rank word books over a selection's composite metrics.
///
/// `score = 0.7 * coverage + 0.3 * precision`. The sort is stable and the
/// input arrives in registration order, so equal scores rank in
/// registration order.
#[tracing::instrument(skip_all)]
pub fn recommend(composite: &CompositeReport) -> Recommendation {
    if composite.no_data || composite.per_book.is_empty() {
        return Recommendation {
            ranking: Vec::new(),
            optimal_book: None,
            advice: vec!["Insufficient data for this selection.".to_string()],
        };
    }

    let mut ranking: Vec<RankedBook> = composite
        .per_book
        .iter()
        .map(|book| RankedBook {
            rank: 0,
            book: book.book.clone(),
            score: round2(
                COVERAGE_WEIGHT.mul_add(book.coverage_rate, PRECISION_WEIGHT * book.precision_rate),
            ),
            coverage_rate: book.coverage_rate,
            precision_rate: book.precision_rate,
        })
        .collect();
    ranking.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    for (index, entry) in ranking.iter_mut().enumerate() {
        entry.rank = index + 1;
    }

    let optimal_book = ranking.first().map(|entry| entry.book.clone());
    let advice = build_advice(composite, &ranking);

    Recommendation {
        ranking,
        optimal_book,
        advice,
    }
}

/// Threshold-based advice strings over the ranking.
fn build_advice(composite: &CompositeReport, ranking: &[RankedBook]) -> Vec<String> {
    let mut advice = Vec::new();

    // The first registered book is the deployment's benchmark list
    if let Some(benchmark) = composite.per_book.first() {
        let sentence = if benchmark.coverage_rate < LOW_COVERAGE {
            format!(
                "{} coverage is low ({:.1}%); fundamental vocabulary needs reinforcement.",
                benchmark.book, benchmark.coverage_rate
            )
        } else if benchmark.coverage_rate < MEDIUM_COVERAGE {
            format!(
                "{} coverage is moderate ({:.1}%); prioritize reviewing its core entries.",
                benchmark.book, benchmark.coverage_rate
            )
        } else {
            format!(
                "{} coverage is solid ({:.1}%); advancing to higher-level vocabulary is reasonable.",
                benchmark.book, benchmark.coverage_rate
            )
        };
        advice.push(sentence);
    }

    if let Some(best) = ranking.first() {
        advice.push(format!(
            "Best-fit word book: {} (coverage {:.1}%, precision {:.1}%).",
            best.book, best.coverage_rate, best.precision_rate
        ));
    }

    let strong_fits: Vec<&str> = ranking
        .iter()
        .filter(|entry| entry.coverage_rate > STRONG_FIT_COVERAGE)
        .map(|entry| entry.book.as_str())
        .collect();
    match strong_fits.len() {
        0 => advice.push(
            "No book shows strong coverage; start with a foundational vocabulary list."
                .to_string(),
        ),
        1 | 2 => advice.push(format!(
            "Focus study on: {}.",
            strong_fits.join(", ")
        )),
        _ => advice.push(
            "Multiple books show strong coverage; the measured vocabulary is well served."
                .to_string(),
        ),
    }

    if !composite.estimated.is_empty() {
        advice.push(format!(
            "Figures for {} are estimates derived from institution-level data.",
            composite.estimated.join(", ")
        ));
    }

    advice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CompositeBookMetrics;

    fn composite(rates: &[(&str, f64, f64)]) -> CompositeReport {
        CompositeReport {
            no_data: false,
            groups: vec!["東京大学".to_string()],
            subsumed: Vec::new(),
            estimated: Vec::new(),
            total_tokens: 100,
            per_book: rates
                .iter()
                .map(|(book, coverage, precision)| CompositeBookMetrics {
                    book: (*book).to_string(),
                    coverage_rate: *coverage,
                    precision_rate: *precision,
                    combined: None,
                    includes_estimates: false,
                })
                .collect(),
        }
    }

    #[test]
    fn weighted_score_orders_books() {
        // A: 0.7*40 + 0.3*20 = 34; B: 0.7*30 + 0.3*50 = 36
        let report = composite(&[("A", 40.0, 20.0), ("B", 30.0, 50.0)]);
        let recommendation = recommend(&report);
        assert_eq!(recommendation.ranking[0].book, "B");
        assert_eq!(recommendation.ranking[0].score, 36.0);
        assert_eq!(recommendation.ranking[1].book, "A");
        assert_eq!(recommendation.ranking[1].score, 34.0);
        assert_eq!(recommendation.optimal_book.as_deref(), Some("B"));
    }

    #[test]
    fn ties_keep_registration_order() {
        let report = composite(&[("First", 30.0, 30.0), ("Second", 30.0, 30.0)]);
        let recommendation = recommend(&report);
        assert_eq!(recommendation.ranking[0].book, "First");
        assert_eq!(recommendation.ranking[1].book, "Second");
    }

    #[test]
    fn ranks_are_one_based_and_sequential() {
        let report = composite(&[("A", 10.0, 10.0), ("B", 50.0, 50.0), ("C", 30.0, 30.0)]);
        let recommendation = recommend(&report);
        let ranks: Vec<usize> = recommendation.ranking.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, [1, 2, 3]);
        assert_eq!(recommendation.ranking[0].book, "B");
    }

    #[test]
    fn no_data_yields_empty_ranking() {
        let mut report = composite(&[]);
        report.no_data = true;
        let recommendation = recommend(&report);
        assert!(recommendation.ranking.is_empty());
        assert!(recommendation.optimal_book.is_none());
        assert_eq!(recommendation.advice.len(), 1);
    }

    #[test]
    fn low_coverage_advises_fundamentals() {
        let report = composite(&[("Target 1900", 12.0, 30.0)]);
        let recommendation = recommend(&report);
        assert!(recommendation.advice[0].contains("low"));
    }

    #[test]
    fn estimate_caveat_included() {
        let mut report = composite(&[("A", 30.0, 30.0)]);
        report.estimated = vec!["東京大学_法学部".to_string()];
        let recommendation = recommend(&report);
        assert!(
            recommendation
                .advice
                .iter()
                .any(|line| line.contains("estimates"))
        );
    }
}
