//! Heuristic English lemmatization.
//!
//! Reduces inflected words to a dictionary base form in two passes: verb-form
//! reduction first, then noun-form reduction of the result. The two-pass
//! order keeps the canonical form deterministic for words with both verbal
//! and nominal inflections ("runs" the verb, "runs" the noun).
//!
//! Each pass consults the irregular-form dictionaries before applying suffix
//! rules. The rules are deliberately conservative: with no full lexicon to
//! validate candidates against, a wrong reduction on one side of a
//! word-book/document comparison would break matches, so ambiguous suffixes
//! are left alone. Both vocabularies pass through this same code, which keeps
//! the canonical space consistent even where a reduction differs from the
//! dictionary lemma.

use crate::dictionaries::irregular_nouns::{UNINFLECTED_MEN, UNINFLECTED_S, irregular_singular};
use crate::dictionaries::irregular_verbs::{
    NO_UNDOUBLE, UNINFLECTED_ED, UNINFLECTED_ING, irregular_verb_base,
};

/// Reduce a cleaned, lower-cased word to its canonical base form.
///
/// Applies verb-form reduction, then noun-form reduction on the result.
pub fn lemmatize(word: &str) -> String {
    let verb = verb_lemma(word);
    noun_lemma(&verb)
}

/// Verb-form reduction: irregular dictionary first, then suffix rules.
fn verb_lemma(word: &str) -> String {
    if let Some(base) = irregular_verb_base(word) {
        return base.to_string();
    }
    // Known irregular plurals ("analyses", "leaves") belong to the noun
    // pass, and uninflected s-words ("news", "physics") to neither
    if irregular_singular(word).is_some() || UNINFLECTED_S.contains(word) {
        return word.to_string();
    }

    let len = word.len();

    // studies → study, carried → carry
    if len > 4 && (word.ends_with("ies") || word.ends_with("ied")) {
        return format!("{}y", &word[..len - 3]);
    }

    // running → run, making → make
    if len >= 6 && word.ends_with("ing") && !UNINFLECTED_ING.contains(word) {
        return restore_stem(&word[..len - 3]);
    }

    // jumped → jump, saved → save; "eed" words (agreed, speed) are never
    // stripped here — inflected ones live in the irregular dictionary
    if len >= 4
        && word.ends_with("ed")
        && !word.ends_with("eed")
        && !UNINFLECTED_ED.contains(word)
    {
        return restore_stem(&word[..len - 2]);
    }

    if len >= 4 && word.ends_with("es") {
        let stem = &word[..len - 2];
        // watches → watch, passes → pass, boxes → box; a single s/z after a
        // vowel is an e-drop ("houses", "sizes") and falls through to -s
        if stem.ends_with(['x', 'o'])
            || stem.ends_with("ss")
            || stem.ends_with("zz")
            || stem.ends_with("ch")
            || stem.ends_with("sh")
        {
            return stem.to_string();
        }
    }

    // runs → run, makes → make
    if len >= 4
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
        && !word.ends_with("ics")
    {
        return word[..len - 1].to_string();
    }

    word.to_string()
}

/// Noun-form reduction: irregular plurals first, then suffix rules.
fn noun_lemma(word: &str) -> String {
    if let Some(singular) = irregular_singular(word) {
        return singular.to_string();
    }
    if UNINFLECTED_S.contains(word) {
        return word.to_string();
    }

    let len = word.len();

    // cities → city
    if len > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..len - 3]);
    }

    // policemen → policeman; but specimen, regimen stay
    if len > 4 && word.ends_with("men") && !UNINFLECTED_MEN.contains(word) {
        return format!("{}man", &word[..len - 3]);
    }

    // churches → church, dishes → dish, classes → class, heroes → hero
    if len >= 5
        && (word.ends_with("xes")
            || word.ends_with("ches")
            || word.ends_with("shes")
            || word.ends_with("sses")
            || word.ends_with("zzes")
            || word.ends_with("oes"))
    {
        return word[..len - 2].to_string();
    }

    // cats → cat
    if len >= 4
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
        && !word.ends_with("ics")
    {
        return word[..len - 1].to_string();
    }

    word.to_string()
}

/// Repair a stem left by stripping "ing" or "ed": undouble a doubled final
/// consonant, or take back the silent "e" the inflection dropped.
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n < 2 {
        return stem.to_string();
    }
    let last = chars[n - 1];
    let prev = chars[n - 2];

    // stopp → stop, runn → run; l/s stay doubled (tell, pass)
    if n >= 3
        && last == prev
        && matches!(last, 'b' | 'd' | 'g' | 'm' | 'n' | 'p' | 'r' | 't')
        && !NO_UNDOUBLE.contains(stem)
    {
        return stem[..stem.len() - 1].to_string();
    }

    if last == 'e' {
        return stem.to_string();
    }

    // English words do not end in bare v/z/c from an e-dropping inflection:
    // receiv → receive, organiz → organize, produc → produce
    if matches!(last, 'v' | 'z' | 'c') {
        return format!("{stem}e");
    }

    // continu → continue, argu → argue
    if last == 'u' && !is_vowel(prev) {
        return format!("{stem}e");
    }

    // caus → cause, promis → promise, hous → house; but focus stays
    if last == 's' && is_vowel(prev) {
        let focus_like = prev == 'u' && n >= 3 && !is_vowel(chars[n - 3]);
        if !focus_like {
            return format!("{stem}e");
        }
    }

    // Single-vowel stems ending vowel+consonant dropped an e: mak → make,
    // writ → write, us → use. w/x/y never carry a silent e.
    if vowel_letters(&chars) == 1 && !is_vowel(last) && !matches!(last, 'w' | 'x' | 'y') && is_vowel(prev)
    {
        return format!("{stem}e");
    }

    // Longer stems where the suffix pattern is unambiguous enough:
    // measur → measure, compil → compile (but offer, deliver stay)
    if matches!(last, 'r' | 'l') && is_vowel(prev) && prev != 'e' && n >= 3 && !is_vowel(chars[n - 3])
    {
        return format!("{stem}e");
    }

    // imagin → imagine, determin → determine (but abandon stays)
    if last == 'n' && prev == 'i' && n >= 3 && !is_vowel(chars[n - 3]) {
        return format!("{stem}e");
    }

    // generat → generate, indicat → indicate (but treat, repeat stay)
    if n >= 5 && last == 't' && prev == 'a' && !is_vowel(chars[n - 3]) {
        return format!("{stem}e");
    }

    stem.to_string()
}

const fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn vowel_letters(chars: &[char]) -> usize {
    chars.iter().filter(|c| is_vowel(**c)).count()
}
