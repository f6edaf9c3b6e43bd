//! Dictionaries for word normalization.
//!
//! Provides the closed word sets used by the normalization pipeline: stop
//! words, irregular verb forms, and irregular noun plurals.

pub mod irregular_nouns;
pub mod irregular_verbs;
pub mod stop_words;
