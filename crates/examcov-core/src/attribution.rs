//! Document attribution: institution and department from the identifier.
//!
//! Document identifiers conventionally encode
//! `institution_year_subject_department`. An ordered rule table maps
//! identifier substrings to institutions; department-distinguishing
//! institutions carry their own pattern list, evaluated most-specific-first
//! so that "理工学部" never falls into "工学部". Identifiers matching no rule
//! land in an unclassified bucket instead of failing the document.
//!
//! This is a best-effort classifier, not a parser: ambiguous filenames can
//! misattribute, which is accepted.

use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Label used when an identifier yields nothing usable.
pub const UNCLASSIFIED: &str = "unclassified";

/// Regex for trailing extraction-artifact extensions (.pdf, .json, chained).
static EXTENSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\.(?:pdf|json))+$").expect("valid regex"));

/// One department of a department-distinguishing institution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DepartmentRule {
    /// Department name used in group labels.
    pub name: String,
    /// Identifier substrings that select this department.
    pub patterns: Vec<String>,
}

/// One institution's matching rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InstitutionRule {
    /// Institution name used in group labels.
    pub name: String,
    /// Identifier substrings that select this institution.
    pub patterns: Vec<String>,
    /// Department patterns, most specific first. Empty for institutions
    /// analyzed whole.
    #[serde(default)]
    pub departments: Vec<DepartmentRule>,
}

impl InstitutionRule {
    /// Rule without department distinction.
    pub fn simple(name: &str, patterns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            patterns: patterns.iter().map(ToString::to_string).collect(),
            departments: Vec::new(),
        }
    }
}

/// A document's resolved institution and department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Attribution {
    /// The document this attribution belongs to.
    pub document_id: String,
    /// Institution name, or the fallback bucket label.
    pub institution: String,
    /// Department, when the institution distinguishes them and one matched.
    pub department: Option<String>,
    /// Whether a configured rule matched (false for fallback buckets).
    pub classified: bool,
}

impl Attribution {
    /// The aggregation group this attribution belongs to
    /// (`institution_department`, or just the institution).
    pub fn group_label(&self) -> String {
        self.department.as_ref().map_or_else(
            || self.institution.clone(),
            |dept| format!("{}_{}", self.institution, dept),
        )
    }

    /// The institution-level group label.
    pub fn institution_label(&self) -> &str {
        &self.institution
    }
}

/// Classifies document identifiers against the configured rule table.
#[derive(Debug)]
pub struct Attributor {
    rules: Vec<InstitutionRule>,
    /// One automaton over every institution pattern; index maps back to the
    /// owning rule so rule order decides among multiple hits.
    automaton: AhoCorasick,
    pattern_owner: Vec<usize>,
}

impl Attributor {
    /// Build an attributor from an ordered rule table.
    pub fn new(rules: Vec<InstitutionRule>) -> Self {
        let mut patterns = Vec::new();
        let mut pattern_owner = Vec::new();
        for (index, rule) in rules.iter().enumerate() {
            for pattern in &rule.patterns {
                patterns.push(pattern.clone());
                pattern_owner.push(index);
            }
        }
        let automaton = AhoCorasick::new(&patterns).expect("valid patterns");
        Self {
            rules,
            automaton,
            pattern_owner,
        }
    }

    /// Attributor with the default deployment's rule table.
    pub fn with_default_rules() -> Self {
        Self::new(default_rules())
    }

    /// The configured rules, in evaluation order.
    pub fn rules(&self) -> &[InstitutionRule] {
        &self.rules
    }

    /// Classify one document identifier.
    pub fn attribute(&self, document_id: &str) -> Attribution {
        let matched_rule = self
            .automaton
            .find_overlapping_iter(document_id)
            .map(|hit| self.pattern_owner[hit.pattern().as_usize()])
            .min();

        matched_rule.map_or_else(
            || self.fallback(document_id),
            |index| {
                let rule = &self.rules[index];
                let department = rule
                    .departments
                    .iter()
                    .find(|dept| dept.patterns.iter().any(|p| document_id.contains(p.as_str())))
                    .map(|dept| dept.name.clone());
                Attribution {
                    document_id: document_id.to_string(),
                    institution: rule.name.clone(),
                    department,
                    classified: true,
                }
            },
        )
    }

    /// Unmatched identifiers keep their leading segment as a best-effort
    /// bucket; a fully unusable identifier gets the generic label.
    fn fallback(&self, document_id: &str) -> Attribution {
        let stem = EXTENSION_PATTERN.replace(document_id, "");
        let institution = stem
            .split('_')
            .find(|segment| !segment.is_empty())
            .unwrap_or(UNCLASSIFIED)
            .to_string();
        debug!(document = document_id, bucket = %institution, "no institution rule matched");
        Attribution {
            document_id: document_id.to_string(),
            institution,
            department: None,
            classified: false,
        }
    }
}

/// The rule table of the original deployment: Japanese universities, with
/// per-faculty distinction for Waseda and Tokyo University of Science.
pub fn default_rules() -> Vec<InstitutionRule> {
    let waseda_departments = [
        ("政治経済学部", "政治経済学部"),
        ("理工学部", "理工学部"),
        ("法学部", "法学部"),
        ("商学部", "商学部"),
        ("文学部", "文学部"),
    ];
    let rikadai_departments = [
        ("理工学部", "理工学部"),
        ("理学部", "理学部"),
        ("工学部", "工学部"),
        ("薬学部", "薬学部"),
    ];
    let department_rules = |table: &[(&str, &str)]| {
        table
            .iter()
            .map(|(name, pattern)| DepartmentRule {
                name: (*name).to_string(),
                patterns: vec![(*pattern).to_string()],
            })
            .collect::<Vec<_>>()
    };

    vec![
        InstitutionRule {
            name: "早稲田大学".to_string(),
            patterns: vec!["早稲田大学".to_string()],
            departments: department_rules(&waseda_departments),
        },
        InstitutionRule {
            name: "東京理科大学".to_string(),
            patterns: vec!["東京理科大学".to_string()],
            departments: department_rules(&rikadai_departments),
        },
        InstitutionRule::simple("東京大学", &["東京大学"]),
        InstitutionRule::simple("慶應義塾大学", &["慶應義塾大学", "慶應"]),
        InstitutionRule::simple("京都大学", &["京都大学"]),
        InstitutionRule::simple("一橋大学", &["一橋大学"]),
        InstitutionRule::simple("大阪大学", &["大阪大学"]),
        InstitutionRule::simple("明治大学", &["明治大学"]),
        InstitutionRule::simple("立教大学", &["立教大学"]),
        InstitutionRule::simple("上智大学", &["上智大学"]),
        InstitutionRule::simple("青山学院大学", &["青山学院大学"]),
    ]
}
