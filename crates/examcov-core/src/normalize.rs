//! Token normalization into canonical vocabularies.
//!
//! The pipeline runs in a fixed order: strip punctuation and lower-case,
//! reject short and purely numeric tokens, lemmatize (verb pass then noun
//! pass), and finally drop stop words. Word books and documents both pass
//! through this code so their vocabularies live in the same canonical space.

use std::collections::{BTreeMap, BTreeSet};

use crate::dictionaries::stop_words::is_stop_word;
use crate::lemma::lemmatize;

/// Strip punctuation and symbols from a raw token and lower-case it.
///
/// Returns `None` when nothing survives the cleaning.
pub fn clean_token(token: &str) -> Option<String> {
    let cleaned: String = token
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Run the full normalization pipeline on a single raw token.
///
/// Returns the canonical word, or `None` when the token is rejected at any
/// stage (too short, purely numeric, or a stop word after lemmatization).
pub fn normalize_token(token: &str) -> Option<String> {
    let cleaned = clean_token(token)?;
    if cleaned.chars().count() < 2 {
        return None;
    }
    if cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let lemma = lemmatize(&cleaned);
    if is_stop_word(&lemma) {
        return None;
    }
    Some(lemma)
}

/// A canonical word set with retained pre-dedup occurrence counts.
///
/// The set defines identity for matching; the counts only feed frequency
/// ranking and aggregation weights.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: BTreeSet<String>,
    frequencies: BTreeMap<String, usize>,
    total_tokens: usize,
}

impl Vocabulary {
    /// Build a vocabulary by normalizing a sequence of raw tokens.
    ///
    /// Empty input produces an empty vocabulary, not an error.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self::default();
        for token in tokens {
            if let Some(word) = normalize_token(token.as_ref()) {
                vocab.total_tokens += 1;
                *vocab.frequencies.entry(word.clone()).or_insert(0) += 1;
                vocab.words.insert(word);
            }
        }
        vocab
    }

    /// The canonical word set.
    pub const fn words(&self) -> &BTreeSet<String> {
        &self.words
    }

    /// Number of distinct canonical words.
    pub fn unique_words(&self) -> usize {
        self.words.len()
    }

    /// Number of tokens that survived normalization, before dedup.
    pub const fn total_tokens(&self) -> usize {
        self.total_tokens
    }

    /// Whether no canonical words were produced.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Occurrence count of one canonical word.
    pub fn frequency(&self, word: &str) -> usize {
        self.frequencies.get(word).copied().unwrap_or(0)
    }

    /// Per-word occurrence counts.
    pub const fn frequencies(&self) -> &BTreeMap<String, usize> {
        &self.frequencies
    }

    /// The `limit` most frequent words, ordered by descending count then
    /// alphabetically for determinism.
    pub fn top_frequencies(&self, limit: usize) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> = self
            .frequencies
            .iter()
            .map(|(w, c)| (w.clone(), *c))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(limit);
        entries
    }

    /// Merge another vocabulary into this one.
    ///
    /// Word sets union, counts add. Used when grouping documents that share
    /// an attribution, so repeated words across documents never inflate the
    /// distinct-word count.
    pub fn merge(&mut self, other: &Self) {
        for (word, count) in &other.frequencies {
            *self.frequencies.entry(word.clone()).or_insert(0) += count;
            self.words.insert(word.clone());
        }
        self.total_tokens += other.total_tokens;
    }

    /// Union of several vocabularies.
    pub fn union_of<'a, I>(vocabularies: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut merged = Self::default();
        for vocab in vocabularies {
            merged.merge(vocab);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_cleans_and_lowercases() {
        assert_eq!(normalize_token("Cat!"), Some("cat".to_string()));
        assert_eq!(normalize_token("  (dog)  "), Some("dog".to_string()));
    }

    #[test]
    fn short_and_numeric_tokens_rejected() {
        assert_eq!(normalize_token("a"), None);
        assert_eq!(normalize_token("I"), None);
        assert_eq!(normalize_token("2024"), None);
        assert_eq!(normalize_token("3,141"), None);
        // mixed alphanumerics survive
        assert_eq!(normalize_token("3rd"), Some("3rd".to_string()));
    }

    #[test]
    fn stop_words_removed_after_lemmatization() {
        assert_eq!(normalize_token("the"), None);
        // "is" lemmatizes to "be", which is a stop word
        assert_eq!(normalize_token("is"), None);
        assert_eq!(normalize_token("being"), None);
    }

    #[test]
    fn punctuation_only_tokens_dropped_silently() {
        assert_eq!(normalize_token("!!!"), None);
        assert_eq!(normalize_token("—"), None);
    }

    #[test]
    fn inflections_collapse_to_one_canonical_word() {
        let vocab = Vocabulary::from_tokens(["running", "ran", "runs"]);
        assert_eq!(vocab.unique_words(), 1);
        assert!(vocab.words().contains("run"));
        assert_eq!(vocab.frequency("run"), 3);
        assert_eq!(vocab.total_tokens(), 3);
    }

    #[test]
    fn empty_input_is_empty_vocabulary() {
        let vocab = Vocabulary::from_tokens(Vec::<&str>::new());
        assert!(vocab.is_empty());
        assert_eq!(vocab.total_tokens(), 0);
    }

    #[test]
    fn normalization_is_idempotent() {
        let first = Vocabulary::from_tokens(["Running", "studies", "cities", "jumped", "cat"]);
        let words: Vec<&str> = first.words().iter().map(String::as_str).collect();
        let second = Vocabulary::from_tokens(words);
        assert_eq!(first.words(), second.words());
    }

    #[test]
    fn top_frequencies_ordered_and_capped() {
        let vocab = Vocabulary::from_tokens(["cat", "cat", "cat", "dog", "dog", "bird"]);
        let top = vocab.top_frequencies(2);
        assert_eq!(top, vec![("cat".to_string(), 3), ("dog".to_string(), 2)]);
    }

    #[test]
    fn merge_unions_words_and_adds_counts() {
        let mut left = Vocabulary::from_tokens(["cat", "dog"]);
        let right = Vocabulary::from_tokens(["cat", "bird"]);
        left.merge(&right);
        assert_eq!(left.unique_words(), 3);
        assert_eq!(left.frequency("cat"), 2);
        assert_eq!(left.total_tokens(), 4);
    }
}
