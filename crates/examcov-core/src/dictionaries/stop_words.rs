//! English stop words.
//!
//! A fixed closed set of function words removed at the end of the
//! normalization pipeline. Entries are stored as they appear *after*
//! punctuation stripping, so contracted forms are listed without apostrophes
//! ("dont", "isnt").

use std::collections::HashSet;
use std::sync::LazyLock;

/// Function words excluded from canonical vocabularies.
pub static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set = HashSet::new();

    // Pronouns and determiners
    set.extend([
        "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
        "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
        "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
        "who", "whom", "this", "that", "these", "those", "all", "any", "both", "each", "few",
        "more", "most", "other", "some", "such",
    ]);

    // Copula, auxiliaries, and their cleaned contractions
    set.extend([
        "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
        "do", "does", "did", "doing", "will", "would", "should", "could", "can", "may", "might",
        "must", "shall", "dont", "doesnt", "didnt", "isnt", "arent", "wasnt", "werent", "hasnt",
        "havent", "hadnt", "wont", "wouldnt", "shouldnt", "couldnt", "cant", "mustnt", "shouldve",
        "youre", "youve", "youll", "youd", "shes", "hes", "theyre", "theyve", "thats", "whos",
        "whats", "aint",
    ]);

    // Articles, conjunctions, prepositions
    set.extend([
        "an", "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at",
        "by", "for", "with", "about", "against", "between", "into", "through", "during", "before",
        "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
        "under", "again", "further", "then", "once",
    ]);

    // Adverbial function words
    set.extend([
        "here", "there", "when", "where", "why", "how", "no", "nor", "not", "only", "own",
        "same", "so", "than", "too", "very", "just", "now",
    ]);

    set
});

/// Check whether a normalized word is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_words_are_stop_words() {
        assert!(is_stop_word("the"));
        assert!(is_stop_word("between"));
        assert!(is_stop_word("being"));
        assert!(is_stop_word("dont"));
    }

    #[test]
    fn content_words_are_not() {
        assert!(!is_stop_word("cat"));
        assert!(!is_stop_word("university"));
        assert!(!is_stop_word("run"));
    }

    #[test]
    fn entries_survive_the_cleaning_step() {
        // Every entry must be lowercase, apostrophe-free, and at least two
        // characters, or the pipeline could never produce it.
        for word in STOP_WORDS.iter() {
            assert!(word.len() >= 2, "{word} too short to reach stop-word removal");
            assert!(
                word.chars().all(|c| c.is_ascii_lowercase()),
                "{word} is not in cleaned form"
            );
        }
    }
}
