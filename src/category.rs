use serde::{Deserialize, Serialize};

/// Method tags recorded on classification results.
pub mod method {
    pub const SUBJECT_CATEGORY_KEYWORD: &str = "subject-category-keyword";
    pub const LABEL_MAPPING: &str = "label-mapping";
    pub const SPECIFIC_SENDER: &str = "specific-sender";
    pub const SENDER_DOMAIN: &str = "sender-domain";
    pub const SENDER_NAME: &str = "sender-name";
    pub const KEYWORD: &str = "keyword";
    pub const KEYWORD_PHRASE: &str = "keyword+phrase";
    pub const KNOWN_SENDER: &str = "known-sender";
    pub const NO_MATCH: &str = "no-match";
    pub const ERROR: &str = "error";
}

/// Coarse evaluation-order bucket for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    High,
    #[default]
    Normal,
    Low,
}

/// Sender-side matching rules for one category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderPatterns {
    /// Exact or dot-boundary suffix matches against the sender domain.
    pub domains: Vec<String>,
    /// Exact or substring matches against the sender display name.
    pub names: Vec<String>,
    pub exclude_domains: Vec<String>,
    pub exclude_names: Vec<String>,
    /// Case-insensitive regexes matched against the raw `From` string,
    /// e.g. a title-prefixed personal-name pattern.
    pub specific_sender_regexes: Vec<String>,
}

impl SenderPatterns {
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
            && self.names.is_empty()
            && self.exclude_domains.is_empty()
            && self.exclude_names.is_empty()
            && self.specific_sender_regexes.is_empty()
    }
}

/// One classification target: a named category with its keyword, phrase,
/// sender and exclusion rules. Immutable for the duration of an evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub priority: PriorityTier,
    /// Multiplier applied to this category's raw keyword score.
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub primary_keywords: Vec<String>,
    #[serde(default)]
    pub secondary_keywords: Vec<String>,
    /// Multi-word literal sequences; carry a boost distinct from keywords.
    #[serde(default)]
    pub phrases: Vec<String>,
    /// Terms that disqualify this category when found anywhere in
    /// sender + subject + snippet.
    #[serde(default)]
    pub exclusion_keywords: Vec<String>,
    /// Whole-word aliases that short-circuit classification when they
    /// appear in the subject line. Empty means no subject short-circuit.
    #[serde(default)]
    pub subject_aliases: Vec<String>,
    #[serde(default)]
    pub sender_patterns: SenderPatterns,
    /// When true, a sender match at or above the trust threshold returns
    /// immediately and is never overridden by keyword evidence.
    #[serde(default)]
    pub trust_on_sender: bool,
}

fn default_weight() -> f64 {
    1.0
}

impl Category {
    pub fn new(name: &str) -> Self {
        Category {
            name: name.to_string(),
            priority: PriorityTier::Normal,
            weight: 1.0,
            primary_keywords: Vec::new(),
            secondary_keywords: Vec::new(),
            phrases: Vec::new(),
            exclusion_keywords: Vec::new(),
            subject_aliases: Vec::new(),
            sender_patterns: SenderPatterns::default(),
            trust_on_sender: false,
        }
    }
}

/// How a label mapping's `source_label` is compared to a message label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Contains,
    Regex,
}

/// A rule associating one provider-supplied label string with a category.
/// Unique per (scope, source_label); higher priority evaluated first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelMapping {
    pub source_label: String,
    pub category_name: String,
    pub match_type: MatchType,
    #[serde(default)]
    pub regex_pattern: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// One inbound message as seen by the classifier. Never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub subject: String,
    pub from: String,
    pub snippet: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// Evidence backing a classification decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub phrases: Vec<String>,
}

impl Evidence {
    pub fn pattern(pattern: &str, value: &str) -> Self {
        Evidence {
            pattern: Some(pattern.to_string()),
            value: Some(value.to_string()),
            keywords: Vec::new(),
            phrases: Vec::new(),
        }
    }
}

/// The single output of a classification: exactly one per message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    pub confidence: f64,
    pub method: String,
    #[serde(default)]
    pub evidence: Evidence,
}

impl ClassificationResult {
    pub fn new(label: &str, confidence: f64, method: &str) -> Self {
        ClassificationResult {
            label: label.to_string(),
            confidence,
            method: method.to_string(),
            evidence: Evidence::default(),
        }
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = evidence;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_yaml_round_trip() {
        let yaml = r#"
name: Placement
priority: high
weight: 1.3
primary_keywords: [placement, recruitment]
phrases: ["placement drive"]
sender_patterns:
  domains: [naukri.com]
  exclude_domains: [servicenow.com]
"#;
        let cat: Category = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cat.name, "Placement");
        assert_eq!(cat.priority, PriorityTier::High);
        assert_eq!(cat.weight, 1.3);
        assert_eq!(cat.sender_patterns.domains, vec!["naukri.com"]);
        assert!(cat.secondary_keywords.is_empty());
        assert!(!cat.trust_on_sender);
    }

    #[test]
    fn test_mapping_defaults() {
        let yaml = r#"
source_label: Job-Fair
category_name: Placement
match_type: exact
"#;
        let mapping: LabelMapping = serde_yaml::from_str(yaml).unwrap();
        assert!(mapping.is_active);
        assert_eq!(mapping.priority, 0);
        assert_eq!(mapping.match_type, MatchType::Exact);
    }

    #[test]
    fn test_empty_category_is_legal() {
        let cat = Category::new("Misc");
        assert!(cat.sender_patterns.is_empty());
        assert!(cat.primary_keywords.is_empty());
    }
}
