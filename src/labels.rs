//! Label-to-category resolution.
//!
//! Provider labels carry the strongest user intent short of an explicit
//! subject mention, so a mapping hit returns at fixed high confidence.

use crate::category::{method, ClassificationResult, Evidence, LabelMapping, MatchType};
use crate::config::ClassifierConfig;
use regex::RegexBuilder;

fn mapping_matches(mapping: &LabelMapping, label: &str) -> bool {
    match mapping.match_type {
        MatchType::Exact => mapping.source_label.eq_ignore_ascii_case(label),
        MatchType::Contains => label
            .to_lowercase()
            .contains(&mapping.source_label.to_lowercase()),
        MatchType::Regex => match &mapping.regex_pattern {
            Some(pattern) => match RegexBuilder::new(pattern).case_insensitive(true).build() {
                Ok(regex) => regex.is_match(label),
                Err(e) => {
                    // An invalid pattern disables this mapping, never the run.
                    log::warn!(
                        "invalid regex '{pattern}' in mapping for '{}': {e}",
                        mapping.source_label
                    );
                    false
                }
            },
            None => false,
        },
    }
}

/// Resolve the message's labels against the mapping set. Active mappings
/// are tested in priority order (descending, stable on ties) against each
/// label in caller order; the first match wins. `None` means no label or
/// no mapping matched, which is not an error.
pub fn resolve_labels(
    labels: &[String],
    mappings: &[LabelMapping],
    config: &ClassifierConfig,
) -> Option<ClassificationResult> {
    if labels.is_empty() || mappings.is_empty() {
        return None;
    }

    let mut active: Vec<&LabelMapping> = mappings.iter().filter(|m| m.is_active).collect();
    active.sort_by_key(|m| std::cmp::Reverse(m.priority));

    for label in labels {
        if label.is_empty() {
            continue;
        }
        for mapping in &active {
            if mapping_matches(mapping, label) {
                log::debug!(
                    "label '{label}' matched mapping '{}' -> {} (priority {})",
                    mapping.source_label,
                    mapping.category_name,
                    mapping.priority
                );
                return Some(
                    ClassificationResult::new(
                        &mapping.category_name,
                        config.label_confidence,
                        method::LABEL_MAPPING,
                    )
                    .with_evidence(Evidence::pattern(&mapping.source_label, label)),
                );
            }
        }
    }

    None
}
