//! Irregular verb forms for lemmatization.
//!
//! Maps inflected forms (past tense, past participle, irregular present) to
//! their base form. Consulted before the suffix rules so that forms like
//! "ran" and "went" reduce correctly.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Inflected verb form → base form.
pub static IRREGULAR_VERB_FORMS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut map = HashMap::new();

        // Copula and auxiliaries
        map.extend([
            ("am", "be"),
            ("is", "be"),
            ("are", "be"),
            ("was", "be"),
            ("were", "be"),
            ("been", "be"),
            ("being", "be"),
            ("has", "have"),
            ("had", "have"),
            ("does", "do"),
            ("did", "do"),
            ("done", "do"),
        ]);

        // Most common irregular verbs, past and participle forms
        map.extend([
            ("went", "go"),
            ("gone", "go"),
            ("goes", "go"),
            ("ran", "run"),
            ("saw", "see"),
            ("seen", "see"),
            ("came", "come"),
            ("took", "take"),
            ("taken", "take"),
            ("gave", "give"),
            ("given", "give"),
            ("made", "make"),
            ("knew", "know"),
            ("known", "know"),
            ("got", "get"),
            ("gotten", "get"),
            ("said", "say"),
            ("told", "tell"),
            ("thought", "think"),
            ("found", "find"),
            ("left", "leave"),
            ("felt", "feel"),
            ("kept", "keep"),
            ("held", "hold"),
            ("brought", "bring"),
            ("bought", "buy"),
            ("taught", "teach"),
            ("caught", "catch"),
            ("sought", "seek"),
            ("fought", "fight"),
            ("sold", "sell"),
            ("built", "build"),
            ("sent", "send"),
            ("spent", "spend"),
            ("lent", "lend"),
            ("bent", "bend"),
            ("meant", "mean"),
            ("met", "meet"),
            ("led", "lead"),
            ("fed", "feed"),
            ("bred", "breed"),
            ("read", "read"),
            ("heard", "hear"),
            ("stood", "stand"),
            ("understood", "understand"),
            ("lost", "lose"),
            ("paid", "pay"),
            ("laid", "lay"),
            ("slept", "sleep"),
            ("swept", "sweep"),
            ("wept", "weep"),
            ("dealt", "deal"),
            ("dreamt", "dream"),
            ("burnt", "burn"),
            ("learnt", "learn"),
            ("spelt", "spell"),
        ]);

        // Vowel-change pasts and -en participles
        map.extend([
            ("wrote", "write"),
            ("written", "write"),
            ("spoke", "speak"),
            ("spoken", "speak"),
            ("broke", "break"),
            ("broken", "break"),
            ("chose", "choose"),
            ("chosen", "choose"),
            ("drove", "drive"),
            ("driven", "drive"),
            ("rose", "rise"),
            ("risen", "rise"),
            ("ate", "eat"),
            ("eaten", "eat"),
            ("fell", "fall"),
            ("fallen", "fall"),
            ("forgot", "forget"),
            ("forgotten", "forget"),
            ("forgave", "forgive"),
            ("forgiven", "forgive"),
            ("froze", "freeze"),
            ("frozen", "freeze"),
            ("hid", "hide"),
            ("hidden", "hide"),
            ("rode", "ride"),
            ("ridden", "ride"),
            ("shook", "shake"),
            ("shaken", "shake"),
            ("stole", "steal"),
            ("stolen", "steal"),
            ("swore", "swear"),
            ("sworn", "swear"),
            ("tore", "tear"),
            ("torn", "tear"),
            ("threw", "throw"),
            ("thrown", "throw"),
            ("wore", "wear"),
            ("worn", "wear"),
            ("beat", "beat"),
            ("beaten", "beat"),
            ("bit", "bite"),
            ("bitten", "bite"),
            ("blew", "blow"),
            ("blown", "blow"),
            ("drew", "draw"),
            ("drawn", "draw"),
            ("flew", "fly"),
            ("flown", "fly"),
            ("grew", "grow"),
            ("grown", "grow"),
            ("withdrew", "withdraw"),
            ("withdrawn", "withdraw"),
            ("arose", "arise"),
            ("arisen", "arise"),
            ("awoke", "awake"),
            ("woke", "wake"),
            ("woken", "wake"),
            ("bore", "bear"),
            ("borne", "bear"),
            ("lay", "lie"),
            ("lain", "lie"),
            ("mistook", "mistake"),
            ("mistaken", "mistake"),
            ("overcame", "overcome"),
            ("underwent", "undergo"),
            ("undergone", "undergo"),
            ("wove", "weave"),
            ("woven", "weave"),
        ]);

        // Sing/sang/sung family
        map.extend([
            ("began", "begin"),
            ("begun", "begin"),
            ("drank", "drink"),
            ("drunk", "drink"),
            ("rang", "ring"),
            ("rung", "ring"),
            ("sang", "sing"),
            ("sung", "sing"),
            ("sank", "sink"),
            ("sunk", "sink"),
            ("shrank", "shrink"),
            ("shrunk", "shrink"),
            ("sprang", "spring"),
            ("sprung", "spring"),
            ("swam", "swim"),
            ("swum", "swim"),
            ("won", "win"),
            ("spun", "spin"),
            ("hung", "hang"),
            ("struck", "strike"),
            ("stuck", "stick"),
            ("swung", "swing"),
            ("clung", "cling"),
            ("flung", "fling"),
            ("stung", "sting"),
            ("strung", "string"),
            ("dug", "dig"),
            ("bound", "bind"),
            ("ground", "grind"),
            ("wound", "wind"),
        ]);

        // -ee verbs whose past would trip the suffix rules
        map.extend([
            ("agreed", "agree"),
            ("freed", "free"),
            ("fled", "flee"),
            ("guaranteed", "guarantee"),
            ("decreed", "decree"),
        ]);

        // Short gerunds and -ie verbs the suffix rules cannot reach
        map.extend([
            ("doing", "do"),
            ("going", "go"),
            ("seeing", "see"),
            ("using", "use"),
            ("dying", "die"),
            ("died", "die"),
            ("lying", "lie"),
            ("lied", "lie"),
            ("tying", "tie"),
            ("tied", "tie"),
        ]);

        // Unchanged pasts kept for explicitness
        map.extend([
            ("let", "let"),
            ("put", "put"),
            ("set", "set"),
            ("cut", "cut"),
            ("hit", "hit"),
            ("hurt", "hurt"),
            ("cost", "cost"),
            ("shut", "shut"),
            ("spread", "spread"),
            ("burst", "burst"),
            ("cast", "cast"),
            ("quit", "quit"),
            ("lit", "light"),
            ("slid", "slide"),
            ("shot", "shoot"),
            ("shone", "shine"),
            ("sped", "speed"),
            ("crept", "creep"),
            ("knelt", "kneel"),
            ("strove", "strive"),
            ("strode", "stride"),
        ]);

        map
    });

/// Words ending in "ed" that are not verb inflections.
pub static UNINFLECTED_ED: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "hundred", "naked", "sacred", "wicked", "rugged", "wretched", "crooked", "beloved",
        "hatred", "shed", "bleed", "breed", "creed", "embed", "infrared",
    ]
    .into_iter()
    .collect()
});

/// Words ending in "ing" that are not verb inflections.
pub static UNINFLECTED_ING: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "thing", "something", "anything", "everything", "nothing", "king", "ring", "spring",
        "string", "wing", "sibling", "darling", "ceiling", "during", "herring", "pudding",
        "viking", "lightning",
    ]
    .into_iter()
    .collect()
});

/// Stems whose final doubled consonant is part of the base form.
pub static NO_UNDOUBLE: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["add", "err", "egg", "inn", "odd", "ebb", "putt", "purr"]
        .into_iter()
        .collect()
});

/// Look up the base form of an irregular verb inflection.
pub fn irregular_verb_base(word: &str) -> Option<&'static str> {
    IRREGULAR_VERB_FORMS.get(word).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_pasts_reduce() {
        assert_eq!(irregular_verb_base("ran"), Some("run"));
        assert_eq!(irregular_verb_base("went"), Some("go"));
        assert_eq!(irregular_verb_base("written"), Some("write"));
        assert_eq!(irregular_verb_base("thought"), Some("think"));
    }

    #[test]
    fn regular_forms_are_absent() {
        assert_eq!(irregular_verb_base("walked"), None);
        assert_eq!(irregular_verb_base("jumping"), None);
    }

    #[test]
    fn auxiliaries_reduce_to_be() {
        assert_eq!(irregular_verb_base("was"), Some("be"));
        assert_eq!(irregular_verb_base("been"), Some("be"));
    }
}
