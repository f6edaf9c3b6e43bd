//! Coverage metrics between a vocabulary and a word book.
//!
//! Every function here is a pure function of the two canonical sets: no
//! hidden state, deterministic, safe for callers to cache or recompute at
//! will.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::normalize::Vocabulary;
use crate::registry::{Registry, WordBook};

/// How many matched-word frequencies a metrics record retains.
const MATCHED_FREQUENCY_CAP: usize = 30;

/// Occurrence threshold for the high-frequency tier.
const HIGH_FREQUENCY_MIN: usize = 10;

/// Occurrence threshold for the medium-frequency tier.
const MEDIUM_FREQUENCY_MIN: usize = 3;

/// Match result for one (vocabulary, word book) pair.
///
/// The three sets partition `book ∪ document`: `matched` is the
/// intersection, the two unmatched sets are the respective differences.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CoverageMetrics {
    /// Canonical words in the book.
    pub book_words: usize,
    /// Distinct canonical words in the document vocabulary.
    pub document_words: usize,
    /// Words present in both.
    pub matched_count: usize,
    /// Share of the book matched, percent (the book's utilization).
    pub coverage_rate: f64,
    /// Share of the document vocabulary matched, percent (extraction
    /// precision).
    pub precision_rate: f64,
    /// The intersection.
    pub matched: BTreeSet<String>,
    /// Book words the document never used.
    pub unmatched_from_book: BTreeSet<String>,
    /// Document words outside the book.
    pub unmatched_from_document: BTreeSet<String>,
    /// Most frequent matched words with their occurrence counts.
    pub matched_frequencies: Vec<WordCount>,
}

/// A word with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WordCount {
    /// The canonical word.
    pub word: String,
    /// Occurrences before dedup.
    pub count: usize,
}

/// Compute coverage metrics for one vocabulary against one book.
#[tracing::instrument(skip_all, fields(book = %book.name))]
pub fn match_vocabulary(book: &WordBook, vocabulary: &Vocabulary) -> CoverageMetrics {
    let document_words = vocabulary.words();
    let matched: BTreeSet<String> = book.words.intersection(document_words).cloned().collect();
    let unmatched_from_book: BTreeSet<String> =
        book.words.difference(document_words).cloned().collect();
    let unmatched_from_document: BTreeSet<String> =
        document_words.difference(&book.words).cloned().collect();

    let coverage_rate = if book.words.is_empty() {
        0.0
    } else {
        round2(matched.len() as f64 / book.words.len() as f64 * 100.0)
    };
    let precision_rate = if document_words.is_empty() {
        0.0
    } else {
        round2(matched.len() as f64 / document_words.len() as f64 * 100.0)
    };

    let mut matched_frequencies: Vec<WordCount> = matched
        .iter()
        .map(|word| WordCount {
            word: word.clone(),
            count: vocabulary.frequency(word),
        })
        .collect();
    matched_frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    matched_frequencies.truncate(MATCHED_FREQUENCY_CAP);

    CoverageMetrics {
        book_words: book.words.len(),
        document_words: document_words.len(),
        matched_count: matched.len(),
        coverage_rate,
        precision_rate,
        matched,
        unmatched_from_book,
        unmatched_from_document,
        matched_frequencies,
    }
}

/// Compute metrics for one vocabulary against every loaded book, in
/// registration order.
pub fn match_all_books(registry: &Registry, vocabulary: &Vocabulary) -> Vec<(String, CoverageMetrics)> {
    registry
        .books()
        .iter()
        .map(|book| (book.name.clone(), match_vocabulary(book, vocabulary)))
        .collect()
}

// -- Frequency tiers --------------------------------------------------------

/// Coverage of one occurrence-frequency tier by a book.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TierMetrics {
    /// Distinct words in the tier.
    pub total_words: usize,
    /// Tier words the book contains.
    pub matched_count: usize,
    /// Share of the tier matched, percent.
    pub coverage_rate: f64,
    /// The matched tier words.
    pub matched: Vec<String>,
}

/// A vocabulary split by occurrence frequency, matched against one book.
///
/// High-frequency words unmatched by a book are the ones worth attention:
/// they recur in the exam text but the book never teaches them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FrequencyTierReport {
    /// Words occurring at least 10 times.
    pub high: TierMetrics,
    /// Words occurring 3–9 times.
    pub medium: TierMetrics,
    /// Words occurring once or twice.
    pub low: TierMetrics,
}

/// Split a vocabulary into frequency tiers and match each against a book.
pub fn frequency_tiers(book: &WordBook, vocabulary: &Vocabulary) -> FrequencyTierReport {
    let mut high = Vec::new();
    let mut medium = Vec::new();
    let mut low = Vec::new();
    for word in vocabulary.words() {
        let count = vocabulary.frequency(word);
        if count >= HIGH_FREQUENCY_MIN {
            high.push(word.clone());
        } else if count >= MEDIUM_FREQUENCY_MIN {
            medium.push(word.clone());
        } else {
            low.push(word.clone());
        }
    }
    FrequencyTierReport {
        high: tier_metrics(book, high),
        medium: tier_metrics(book, medium),
        low: tier_metrics(book, low),
    }
}

fn tier_metrics(book: &WordBook, tier: Vec<String>) -> TierMetrics {
    let matched: Vec<String> = tier
        .iter()
        .filter(|word| book.words.contains(*word))
        .cloned()
        .collect();
    let coverage_rate = if tier.is_empty() {
        0.0
    } else {
        round2(matched.len() as f64 / tier.len() as f64 * 100.0)
    };
    TierMetrics {
        total_words: tier.len(),
        matched_count: matched.len(),
        coverage_rate,
        matched,
    }
}

// -- Summary statistics -----------------------------------------------------

/// Cross-book summary over one set of per-book metrics.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummaryStatistics {
    /// Mean coverage rate across books.
    pub average_coverage_rate: f64,
    /// Mean precision rate across books.
    pub average_precision_rate: f64,
    /// Book with the highest coverage rate.
    pub best_coverage_book: BestBook,
    /// Book with the highest precision rate.
    pub best_precision_book: BestBook,
    /// Number of books summarized.
    pub total_books: usize,
}

/// A best-performing book and its rate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BestBook {
    /// Book name.
    pub name: String,
    /// The winning rate, percent.
    pub rate: f64,
}

/// Summarize per-book metrics. Returns `None` when no book is available.
pub fn summarize(per_book: &[(String, CoverageMetrics)]) -> Option<SummaryStatistics> {
    if per_book.is_empty() {
        return None;
    }
    let n = per_book.len() as f64;
    let average_coverage_rate =
        round2(per_book.iter().map(|(_, m)| m.coverage_rate).sum::<f64>() / n);
    let average_precision_rate =
        round2(per_book.iter().map(|(_, m)| m.precision_rate).sum::<f64>() / n);

    // max_by with a stable tie-break on registration order: earlier wins
    let best = |key: fn(&CoverageMetrics) -> f64| {
        let mut winner = &per_book[0];
        for candidate in &per_book[1..] {
            if key(&candidate.1) > key(&winner.1) {
                winner = candidate;
            }
        }
        BestBook {
            name: winner.0.clone(),
            rate: key(&winner.1),
        }
    };

    Some(SummaryStatistics {
        average_coverage_rate,
        average_precision_rate,
        best_coverage_book: best(|m| m.coverage_rate),
        best_precision_book: best(|m| m.precision_rate),
        total_books: per_book.len(),
    })
}

/// Round to two decimal places, matching report precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Vocabulary;

    fn book(words: &[&str]) -> WordBook {
        WordBook::from_entries("Test", words.iter().copied())
    }

    #[test]
    fn worked_example() {
        // book {cat,dog,run} vs document {cat,run,jump}
        let book = book(&["cat", "dog", "run"]);
        let vocab = Vocabulary::from_tokens(["cat", "run", "jump"]);
        let metrics = match_vocabulary(&book, &vocab);

        assert_eq!(metrics.matched_count, 2);
        assert_eq!(metrics.coverage_rate, 66.67);
        assert_eq!(metrics.precision_rate, 66.67);
        assert!(metrics.matched.contains("cat") && metrics.matched.contains("run"));
        assert_eq!(metrics.unmatched_from_book.iter().collect::<Vec<_>>(), ["dog"]);
        assert_eq!(
            metrics.unmatched_from_document.iter().collect::<Vec<_>>(),
            ["jump"]
        );
    }

    #[test]
    fn partition_law() {
        let book = book(&["alpha", "beta", "gamma", "delta"]);
        let vocab = Vocabulary::from_tokens(["beta", "delta", "epsilon", "zeta"]);
        let metrics = match_vocabulary(&book, &vocab);

        let mut union: BTreeSet<String> = book.words.clone();
        union.extend(vocab.words().iter().cloned());

        let mut rebuilt = metrics.matched.clone();
        assert!(rebuilt.is_disjoint(&metrics.unmatched_from_book));
        assert!(rebuilt.is_disjoint(&metrics.unmatched_from_document));
        assert!(
            metrics
                .unmatched_from_book
                .is_disjoint(&metrics.unmatched_from_document)
        );
        rebuilt.extend(metrics.unmatched_from_book.iter().cloned());
        rebuilt.extend(metrics.unmatched_from_document.iter().cloned());
        assert_eq!(rebuilt, union);
    }

    #[test]
    fn rates_stay_in_range() {
        let cases = [
            (vec!["cat"], vec!["cat"]),
            (vec!["cat", "dog"], vec!["bird"]),
            (vec!["cat"], vec![]),
        ];
        for (book_words, doc_words) in cases {
            let book = book(&book_words);
            let vocab = Vocabulary::from_tokens(doc_words);
            let metrics = match_vocabulary(&book, &vocab);
            assert!((0.0..=100.0).contains(&metrics.coverage_rate));
            assert!((0.0..=100.0).contains(&metrics.precision_rate));
        }
    }

    #[test]
    fn empty_document_is_all_zero_not_an_error() {
        let book = book(&["cat", "dog"]);
        let metrics = match_vocabulary(&book, &Vocabulary::default());
        assert_eq!(metrics.matched_count, 0);
        assert_eq!(metrics.precision_rate, 0.0);
        assert_eq!(metrics.coverage_rate, 0.0);
    }

    #[test]
    fn union_monotonicity() {
        let book = book(&["cat", "dog", "bird", "fish"]);
        let left = Vocabulary::from_tokens(["cat", "lion"]);
        let right = Vocabulary::from_tokens(["dog", "tiger"]);

        let alone = match_vocabulary(&book, &left).matched_count;
        let combined_vocab = Vocabulary::union_of([&left, &right]);
        let combined = match_vocabulary(&book, &combined_vocab).matched_count;
        assert!(combined >= alone);
        assert_eq!(combined, 2);
    }

    #[test]
    fn matched_frequencies_ordered_by_count() {
        let book = book(&["cat", "dog"]);
        let vocab = Vocabulary::from_tokens(["dog", "cat", "dog", "dog", "cat", "dog"]);
        let metrics = match_vocabulary(&book, &vocab);
        assert_eq!(metrics.matched_frequencies[0].word, "dog");
        assert_eq!(metrics.matched_frequencies[0].count, 4);
        assert_eq!(metrics.matched_frequencies[1].count, 2);
    }

    #[test]
    fn tiers_split_on_occurrence_thresholds() {
        let mut tokens = Vec::new();
        tokens.extend(std::iter::repeat_n("cat", 12));
        tokens.extend(std::iter::repeat_n("dog", 5));
        tokens.push("bird");
        let vocab = Vocabulary::from_tokens(tokens);
        let book = book(&["cat", "bird"]);

        let tiers = frequency_tiers(&book, &vocab);
        assert_eq!(tiers.high.total_words, 1);
        assert_eq!(tiers.high.matched_count, 1);
        assert_eq!(tiers.high.coverage_rate, 100.0);
        assert_eq!(tiers.medium.total_words, 1);
        assert_eq!(tiers.medium.matched_count, 0);
        assert_eq!(tiers.low.total_words, 1);
        assert_eq!(tiers.low.matched_count, 1);
    }

    #[test]
    fn summary_picks_best_books() {
        let book_a = WordBook::from_entries("A", ["cat", "dog", "bird", "fish", "lion"]);
        let book_b = WordBook::from_entries("B", ["cat", "dog"]);
        let vocab = Vocabulary::from_tokens(["cat", "dog", "wolf"]);
        let per_book = vec![
            ("A".to_string(), match_vocabulary(&book_a, &vocab)),
            ("B".to_string(), match_vocabulary(&book_b, &vocab)),
        ];
        let summary = summarize(&per_book).unwrap();
        // B matches 2/2 = 100% coverage; A matches 2/5 = 40%
        assert_eq!(summary.best_coverage_book.name, "B");
        assert_eq!(summary.total_books, 2);
        assert!(summary.average_coverage_rate > 0.0);
    }

    #[test]
    fn summary_of_nothing_is_none() {
        assert!(summarize(&[]).is_none());
    }
}
