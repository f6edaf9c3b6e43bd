//! Word-book registry.
//!
//! Loads named vocabulary tables into canonical word sets. Every book ships
//! with its own source schema — the column holding the words differs per
//! publisher — so each source carries the column name to read. A book that
//! fails to load is recorded as unavailable and excluded downstream; users
//! routinely run with a subset of books present, so one bad table must never
//! abort the run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::RegistryError;
use crate::normalize::normalize_token;

/// Where one word book's table lives and which column holds the words.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BookSource {
    /// Display name of the book (e.g. "Target 1900").
    pub name: String,
    /// Path of the CSV table.
    pub file: String,
    /// Name of the column holding the vocabulary entries.
    pub column: String,
}

/// A loaded word book: a named canonical vocabulary.
#[derive(Debug, Clone)]
pub struct WordBook {
    /// Display name of the book.
    pub name: String,
    /// Canonical word set after normalization.
    pub words: BTreeSet<String>,
}

impl WordBook {
    /// Build a book directly from raw entries (used by tests and callers
    /// that already hold the vocabulary in memory).
    pub fn from_entries<I, S>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = entries
            .into_iter()
            .filter_map(|entry| normalize_token(entry.as_ref()))
            .collect();
        Self {
            name: name.into(),
            words,
        }
    }

    /// Number of canonical words in the book.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the book holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// A book that could not be loaded, kept for reporting.
#[derive(Debug)]
pub struct UnavailableBook {
    /// Display name of the book.
    pub name: String,
    /// Why the load failed.
    pub error: RegistryError,
}

/// All word books for one analysis session, in registration order.
///
/// Registration order is load order and drives recommendation tie-breaking,
/// so it must stay stable.
#[derive(Debug, Default)]
pub struct Registry {
    books: Vec<WordBook>,
    unavailable: Vec<UnavailableBook>,
}

impl Registry {
    /// Load every configured book, tolerating per-book failures.
    pub fn load(sources: &[BookSource]) -> Self {
        let mut registry = Self::default();
        for source in sources {
            match load_book(source) {
                Ok(book) => {
                    info!(book = %book.name, words = book.len(), "word book loaded");
                    registry.books.push(book);
                }
                Err(error) => {
                    warn!(book = %source.name, %error, "word book unavailable");
                    registry.unavailable.push(UnavailableBook {
                        name: source.name.clone(),
                        error,
                    });
                }
            }
        }
        registry
    }

    /// Register an already-built book (keeps registration order).
    pub fn register(&mut self, book: WordBook) {
        self.books.push(book);
    }

    /// Loaded books in registration order.
    pub fn books(&self) -> &[WordBook] {
        &self.books
    }

    /// Books that failed to load.
    pub fn unavailable(&self) -> &[UnavailableBook] {
        &self.unavailable
    }

    /// Find a loaded book by name.
    pub fn get(&self, name: &str) -> Option<&WordBook> {
        self.books.iter().find(|book| book.name == name)
    }

    /// Number of loaded books.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether no book loaded.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Load one book from its CSV table.
fn load_book(source: &BookSource) -> Result<WordBook, RegistryError> {
    let raw = std::fs::read_to_string(&source.file).map_err(|e| RegistryError::Read {
        path: source.file.clone(),
        source: e,
    })?;
    // Tables exported from spreadsheets often lead with a UTF-8 BOM
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(raw.as_bytes());

    let headers = reader.headers().map_err(|e| RegistryError::Parse {
        path: source.file.clone(),
        source: e,
    })?;
    let column_index = headers
        .iter()
        .position(|h| h.trim() == source.column)
        .ok_or_else(|| RegistryError::MissingColumn {
            path: source.file.clone(),
            column: source.column.clone(),
        })?;

    let mut words = BTreeSet::new();
    for record in reader.records() {
        let record = record.map_err(|e| RegistryError::Parse {
            path: source.file.clone(),
            source: e,
        })?;
        let Some(cell) = record.get(column_index) else {
            continue;
        };
        if let Some(word) = normalize_token(cell) {
            words.insert(word);
        }
    }

    if words.is_empty() {
        return Err(RegistryError::Empty {
            path: source.file.clone(),
        });
    }

    Ok(WordBook {
        name: source.name.clone(),
        words,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn source(name: &str, file: String, column: &str) -> BookSource {
        BookSource {
            name: name.to_string(),
            file,
            column: column.to_string(),
        }
    }

    #[test]
    fn loads_designated_column() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_csv(&dir, "book.csv", "no,word,meaning\n1,cat,ネコ\n2,running,走る\n");
        let registry = Registry::load(&[source("Test", file, "word")]);
        assert_eq!(registry.len(), 1);
        let book = registry.get("Test").unwrap();
        assert!(book.words.contains("cat"));
        // entries go through the same normalization as documents
        assert!(book.words.contains("run"));
    }

    #[test]
    fn bom_on_header_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_csv(&dir, "bom.csv", "\u{feff}word\ncat\ndog\n");
        let registry = Registry::load(&[source("Bom", file, "word")]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Bom").unwrap().len(), 2);
    }

    #[test]
    fn missing_file_marks_book_unavailable() {
        let registry = Registry::load(&[source("Ghost", "/no/such/file.csv".to_string(), "word")]);
        assert!(registry.is_empty());
        assert_eq!(registry.unavailable().len(), 1);
        assert!(matches!(
            registry.unavailable()[0].error,
            RegistryError::Read { .. }
        ));
    }

    #[test]
    fn missing_column_marks_book_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_csv(&dir, "cols.csv", "english,japanese\ncat,ネコ\n");
        let registry = Registry::load(&[source("Wrong", file, "word")]);
        assert!(registry.is_empty());
        assert!(matches!(
            registry.unavailable()[0].error,
            RegistryError::MissingColumn { .. }
        ));
    }

    #[test]
    fn one_bad_book_does_not_block_others() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_csv(&dir, "good.csv", "word\ncat\n");
        let registry = Registry::load(&[
            source("Missing", "/no/such/file.csv".to_string(), "word"),
            source("Good", good, "word"),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.unavailable().len(), 1);
        assert!(registry.get("Good").is_some());
    }

    #[test]
    fn registration_order_is_load_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(&dir, "a.csv", "word\ncat\n");
        let b = write_csv(&dir, "b.csv", "word\ndog\n");
        let registry = Registry::load(&[source("First", a, "word"), source("Second", b, "word")]);
        let names: Vec<&str> = registry.books().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["First", "Second"]);
    }

    #[test]
    fn all_numeric_table_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_csv(&dir, "nums.csv", "word\n123\n456\n");
        let registry = Registry::load(&[source("Nums", file, "word")]);
        assert!(matches!(
            registry.unavailable()[0].error,
            RegistryError::Empty { .. }
        ));
    }
}
