//! Documents and extraction-result ingestion.
//!
//! A [`Document`] is one source file's extraction output after normalization.
//! Ingestion accepts both historical extraction JSON layouts: the keyed
//! format (filename → record) and the older list format under an
//! `extracted_data` key. Detection follows the shape of the data, not a
//! version field, because the files in circulation carry none.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::error::{IngestError, IngestResult};
use crate::normalize::Vocabulary;

/// One ingested source document, immutable for the analysis session.
#[derive(Debug, Clone)]
pub struct Document {
    /// Source identifier, conventionally the extracted file's name.
    pub id: String,
    /// Canonical vocabulary produced by the normalization pipeline.
    pub vocabulary: Vocabulary,
    /// Extraction confidence reported by the upstream OCR step, 0.0–1.0.
    pub confidence: Option<f64>,
    /// Pages the extractor processed for this document.
    pub pages_processed: Option<u32>,
}

impl Document {
    /// Build a document by normalizing raw extracted words.
    pub fn new(id: impl Into<String>, words: &[String]) -> Self {
        Self {
            id: id.into(),
            vocabulary: Vocabulary::from_tokens(words),
            confidence: None,
            pages_processed: None,
        }
    }
}

/// Per-file payload in the keyed extraction format.
#[derive(Debug, Deserialize)]
struct KeyedEntry {
    extracted_words: Vec<String>,
    #[serde(default)]
    ocr_confidence: Option<f64>,
    #[serde(default)]
    pages_processed: Option<u32>,
}

/// Item of the `extracted_data` list in the older format.
#[derive(Debug, Deserialize)]
struct ListedEntry {
    source_file: String,
    #[serde(default)]
    extracted_words: Vec<String>,
    #[serde(default)]
    ocr_confidence: Option<f64>,
    #[serde(default)]
    pages_processed: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ListedFormat {
    extracted_data: Vec<ListedEntry>,
}

/// Parse extraction-results JSON into documents, auto-detecting the format.
///
/// The keyed format maps filenames to records with an `extracted_words`
/// array; the list format nests records under `extracted_data`. Entries
/// without usable words still become (empty) documents so attribution and
/// reporting can account for them.
pub fn parse_extraction_json(json: &str) -> IngestResult<Vec<Document>> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    if value.get("extracted_data").is_some() {
        let parsed: ListedFormat = serde_json::from_value(value)?;
        debug!(documents = parsed.extracted_data.len(), "detected extracted_data format");
        return Ok(parsed
            .extracted_data
            .into_iter()
            .map(|entry| {
                let mut doc = Document::new(entry.source_file, &entry.extracted_words);
                doc.confidence = entry.ocr_confidence;
                doc.pages_processed = entry.pages_processed;
                doc
            })
            .collect());
    }

    // Keyed format: every value that looks like a record becomes a document.
    // BTreeMap keeps document order stable regardless of JSON key order.
    let object = value.as_object().ok_or(IngestError::UnknownFormat)?;
    let mut documents = Vec::new();
    let keyed: BTreeMap<&String, &serde_json::Value> = object.iter().collect();
    for (filename, entry) in keyed {
        if entry.get("extracted_words").is_none() {
            continue;
        }
        let parsed: KeyedEntry = serde_json::from_value(entry.clone())?;
        let mut doc = Document::new(filename.clone(), &parsed.extracted_words);
        doc.confidence = parsed.ocr_confidence;
        doc.pages_processed = parsed.pages_processed;
        documents.push(doc);
    }

    if documents.is_empty() {
        return Err(IngestError::UnknownFormat);
    }
    debug!(documents = documents.len(), "detected keyed extraction format");
    Ok(documents)
}

/// Read and parse an extraction-results file.
pub fn load_extraction_file(path: &str) -> IngestResult<Vec<Document>> {
    let json = std::fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.to_string(),
        source,
    })?;
    parse_extraction_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_format_parses() {
        let json = r#"{
            "waseda_2023_english_law.pdf": {
                "extracted_words": ["The", "cats", "ran", "quickly"],
                "ocr_confidence": 0.93,
                "pages_processed": 12
            }
        }"#;
        let docs = parse_extraction_json(json).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "waseda_2023_english_law.pdf");
        assert_eq!(docs[0].confidence, Some(0.93));
        assert_eq!(docs[0].pages_processed, Some(12));
        assert!(docs[0].vocabulary.words().contains("cat"));
        assert!(docs[0].vocabulary.words().contains("run"));
    }

    #[test]
    fn listed_format_parses() {
        let json = r#"{
            "extracted_data": [
                { "source_file": "a.pdf", "extracted_words": ["dog"] },
                { "source_file": "b.pdf", "extracted_words": ["bird"], "ocr_confidence": 0.8 }
            ]
        }"#;
        let docs = parse_extraction_json(json).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "a.pdf");
        assert_eq!(docs[1].confidence, Some(0.8));
    }

    #[test]
    fn both_formats_yield_identical_records() {
        let keyed = r#"{ "x.pdf": { "extracted_words": ["running", "cats"] } }"#;
        let listed =
            r#"{ "extracted_data": [ { "source_file": "x.pdf", "extracted_words": ["running", "cats"] } ] }"#;
        let from_keyed = parse_extraction_json(keyed).unwrap();
        let from_listed = parse_extraction_json(listed).unwrap();
        assert_eq!(from_keyed[0].id, from_listed[0].id);
        assert_eq!(from_keyed[0].vocabulary.words(), from_listed[0].vocabulary.words());
    }

    #[test]
    fn unrecognized_shapes_are_rejected() {
        assert!(matches!(
            parse_extraction_json(r#"{ "just": "strings" }"#),
            Err(IngestError::UnknownFormat)
        ));
        assert!(matches!(
            parse_extraction_json("[1, 2, 3]"),
            Err(IngestError::UnknownFormat)
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            parse_extraction_json("{ not json"),
            Err(IngestError::Parse(_))
        ));
    }

    #[test]
    fn empty_word_lists_become_empty_documents() {
        let json = r#"{ "empty.pdf": { "extracted_words": [] } }"#;
        let docs = parse_extraction_json(json).unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].vocabulary.is_empty());
    }
}
