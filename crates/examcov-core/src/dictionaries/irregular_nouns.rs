//! Irregular noun plurals for lemmatization.
//!
//! Maps plural forms to singular where the suffix rules would guess wrong,
//! plus guard sets for words that look plural but are not.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Plural form → singular form.
pub static IRREGULAR_PLURALS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Ablaut plurals
    map.extend([
        ("men", "man"),
        ("women", "woman"),
        ("children", "child"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("geese", "goose"),
        ("mice", "mouse"),
        ("lice", "louse"),
        ("oxen", "ox"),
    ]);

    // -ves plurals
    map.extend([
        ("knives", "knife"),
        ("wives", "wife"),
        ("thieves", "thief"),
        ("leaves", "leaf"),
        ("wolves", "wolf"),
        ("shelves", "shelf"),
        ("loaves", "loaf"),
        ("halves", "half"),
        ("calves", "calf"),
        ("scarves", "scarf"),
        ("selves", "self"),
    ]);

    // Latin and Greek plurals common in exam prose
    map.extend([
        ("data", "datum"),
        ("media", "medium"),
        ("criteria", "criterion"),
        ("phenomena", "phenomenon"),
        ("analyses", "analysis"),
        ("crises", "crisis"),
        ("theses", "thesis"),
        ("hypotheses", "hypothesis"),
        ("bases", "basis"),
        ("bacteria", "bacterium"),
        ("curricula", "curriculum"),
        ("fungi", "fungus"),
        ("stimuli", "stimulus"),
        ("indices", "index"),
        ("appendices", "appendix"),
        ("matrices", "matrix"),
    ]);

    // Forms the -es/-s rules would mangle
    map.extend([
        ("buses", "bus"),
        ("shoes", "shoe"),
        ("toes", "toe"),
        ("heroes", "hero"),
        ("potatoes", "potato"),
        ("tomatoes", "tomato"),
        ("echoes", "echo"),
        ("pianos", "piano"),
        ("photos", "photo"),
    ]);

    map
});

/// Words ending in "s" that are singular or uncountable.
pub static UNINFLECTED_S: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "news",
        "series",
        "species",
        "means",
        "physics",
        "mathematics",
        "economics",
        "politics",
        "ethics",
        "athletics",
        "statistics",
        "electronics",
        "linguistics",
        "always",
        "perhaps",
        "whereas",
        "besides",
        "sometimes",
        "towards",
        "headquarters",
        "diabetes",
        "measles",
    ]
    .into_iter()
    .collect()
});

/// Words ending in "men" that are not plurals of "-man".
pub static UNINFLECTED_MEN: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "specimen", "regimen", "abdomen", "acumen", "ramen", "amen", "omen", "semen", "lumen",
        "hymen",
    ]
    .into_iter()
    .collect()
});

/// Look up the singular form of an irregular plural.
pub fn irregular_singular(word: &str) -> Option<&'static str> {
    IRREGULAR_PLURALS.get(word).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ablaut_plurals_reduce() {
        assert_eq!(irregular_singular("children"), Some("child"));
        assert_eq!(irregular_singular("feet"), Some("foot"));
        assert_eq!(irregular_singular("mice"), Some("mouse"));
    }

    #[test]
    fn uninflected_words_guarded() {
        assert!(UNINFLECTED_S.contains("news"));
        assert!(UNINFLECTED_S.contains("species"));
        assert_eq!(irregular_singular("news"), None);
    }
}
