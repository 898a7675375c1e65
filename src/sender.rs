//! Sender parsing and pattern matching.
//!
//! Extracts the display name and domain from an RFC-style `From` string and
//! evaluates a category's sender rules: exclusions first, then specific
//! regexes, domain patterns, and display-name patterns in that order.

use crate::category::{method, Evidence};
use crate::config::ClassifierConfig;
use crate::registry::CompiledCategory;

/// A positive sender match for one category.
#[derive(Debug, Clone)]
pub struct SenderMatch {
    pub confidence: f64,
    pub method: &'static str,
    pub evidence: Evidence,
}

/// Extract the address part of a `From` string.
/// `"HOD CSE <hod.cse@sharda.ac.in>"` -> `"hod.cse@sharda.ac.in"`.
fn extract_address(from: &str) -> &str {
    match (from.find('<'), from.rfind('>')) {
        (Some(start), Some(end)) if start < end => &from[start + 1..end],
        _ => from.trim(),
    }
}

/// Extract the sender domain, lowercased: the substring after `@` in the
/// embedded address. Returns `None` when no address is present.
pub fn sender_domain(from: &str) -> Option<String> {
    extract_address(from)
        .split('@')
        .nth(1)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

/// Extract the sender display name: the part before `<`, stripped of quotes.
/// Falls back to the whole string when no angle-bracket address exists.
pub fn sender_display_name(from: &str) -> String {
    let name = match from.find('<') {
        Some(idx) => &from[..idx],
        None => from,
    };
    name.trim().trim_matches('"').trim_matches('\'').trim().to_string()
}

/// Exact or substring match, case-insensitive. Used for exclusion lists
/// where "email.openai.com" must hit the "openai.com" entry.
fn matches_loosely(value: &str, patterns: &[String]) -> Option<String> {
    let value_lower = value.to_lowercase();
    for pattern in patterns {
        if value_lower == *pattern || value_lower.contains(pattern.as_str()) {
            return Some(pattern.clone());
        }
    }
    None
}

/// Exact or dot-boundary suffix match for domains, so `mail.etsy.com`
/// matches `etsy.com` but `notetsy.com` does not.
fn matches_domain_pattern(domain: &str, pattern: &str) -> bool {
    domain == pattern || domain.ends_with(&format!(".{pattern}"))
}

/// Whether any exclusion rule of the category vetoes this message.
/// Must run before any positive match is accepted: a hit disqualifies the
/// category outright regardless of keyword score.
pub fn is_excluded(from: &str, subject: &str, snippet: &str, category: &CompiledCategory) -> bool {
    if !category.exclusion_keywords.is_empty() {
        let haystack = format!("{from} {subject} {snippet}").to_lowercase();
        for term in &category.exclusion_keywords {
            if haystack.contains(term.as_str()) {
                log::debug!(
                    "exclusion keyword '{term}' vetoes category '{}'",
                    category.def.name
                );
                return true;
            }
        }
    }

    if !category.exclude_domains.is_empty() {
        if let Some(domain) = sender_domain(from) {
            if let Some(pattern) = matches_loosely(&domain, &category.exclude_domains) {
                log::debug!(
                    "domain '{domain}' matches exclusion '{pattern}' for category '{}'",
                    category.def.name
                );
                return true;
            }
        }
    }

    if !category.exclude_names.is_empty() {
        let name = sender_display_name(from);
        if !name.is_empty() {
            if let Some(pattern) = matches_loosely(&name, &category.exclude_names) {
                log::debug!(
                    "name '{name}' matches exclusion '{pattern}' for category '{}'",
                    category.def.name
                );
                return true;
            }
        }
    }

    false
}

/// Evaluate a category's positive sender patterns against `from`.
/// First hit wins, highest-confidence source first: specific regexes,
/// then domains, then display names. Returns `None` on no match.
pub fn match_sender(
    from: &str,
    category: &CompiledCategory,
    config: &ClassifierConfig,
) -> Option<SenderMatch> {
    if from.is_empty() {
        return None;
    }

    for regex in &category.specific_sender_regexes {
        if regex.is_match(from) {
            return Some(SenderMatch {
                confidence: config.specific_sender_confidence,
                method: method::SPECIFIC_SENDER,
                evidence: Evidence::pattern(regex.as_str(), from),
            });
        }
    }

    if let Some(domain) = sender_domain(from) {
        for pattern in &category.domains {
            if matches_domain_pattern(&domain, pattern) {
                return Some(SenderMatch {
                    confidence: config.sender_domain_confidence,
                    method: method::SENDER_DOMAIN,
                    evidence: Evidence::pattern(pattern, &domain),
                });
            }
        }
    }

    let name = sender_display_name(from);
    if !name.is_empty() {
        let name_lower = name.to_lowercase();
        for pattern in &category.names {
            if name_lower == *pattern || name_lower.contains(pattern.as_str()) {
                return Some(SenderMatch {
                    confidence: config.sender_name_confidence,
                    method: method::SENDER_NAME,
                    evidence: Evidence::pattern(pattern, &name),
                });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Category, SenderPatterns};
    use crate::registry::CompiledCategory;

    fn compiled(category: Category) -> CompiledCategory {
        CompiledCategory::compile(category)
    }

    #[test]
    fn test_sender_domain_extraction() {
        assert_eq!(
            sender_domain("HOD CSE <hod.cse@sharda.ac.in>"),
            Some("sharda.ac.in".to_string())
        );
        assert_eq!(
            sender_domain("user@Example.COM"),
            Some("example.com".to_string())
        );
        assert_eq!(sender_domain("no address here"), None);
    }

    #[test]
    fn test_display_name_extraction() {
        assert_eq!(
            sender_display_name("\"NPTEL Team\" <noreply@nptel.ac.in>"),
            "NPTEL Team"
        );
        assert_eq!(sender_display_name("bare@example.com"), "bare@example.com");
    }

    #[test]
    fn test_domain_suffix_matching() {
        assert!(matches_domain_pattern("mail.etsy.com", "etsy.com"));
        assert!(matches_domain_pattern("etsy.com", "etsy.com"));
        assert!(!matches_domain_pattern("notetsy.com", "etsy.com"));
        assert!(!matches_domain_pattern("etsy.com", "mail.etsy.com"));
    }

    #[test]
    fn test_domain_match() {
        let mut cat = Category::new("HOD");
        cat.sender_patterns = SenderPatterns {
            domains: vec!["sharda.ac.in".to_string()],
            ..Default::default()
        };
        let cat = compiled(cat);
        let config = ClassifierConfig::default();

        let hit = match_sender("HOD CSE <hod.cse@sharda.ac.in>", &cat, &config).unwrap();
        assert_eq!(hit.method, "sender-domain");
        assert_eq!(hit.confidence, 0.90);
        assert_eq!(hit.evidence.value.as_deref(), Some("sharda.ac.in"));

        assert!(match_sender("x <x@elsewhere.org>", &cat, &config).is_none());
    }

    #[test]
    fn test_name_match() {
        let mut cat = Category::new("Placement");
        cat.sender_patterns.names = vec!["Placement Cell".to_string()];
        let cat = compiled(cat);
        let config = ClassifierConfig::default();

        let hit = match_sender("SU Placement Cell <tpo@example.com>", &cat, &config).unwrap();
        assert_eq!(hit.method, "sender-name");
        assert_eq!(hit.confidence, 0.90);
    }

    #[test]
    fn test_specific_sender_outranks_domain() {
        let mut cat = Category::new("Professor");
        cat.sender_patterns.domains = vec!["sharda.ac.in".to_string()];
        cat.sender_patterns.specific_sender_regexes = vec![r"dr\.\s+\w+\s+\w+".to_string()];
        let cat = compiled(cat);
        let config = ClassifierConfig::default();

        let hit = match_sender(
            "Dr. Nishant Gupta <nishant.gupta@sharda.ac.in>",
            &cat,
            &config,
        )
        .unwrap();
        assert_eq!(hit.method, "specific-sender");
        assert_eq!(hit.confidence, 0.95);
    }

    #[test]
    fn test_exclusion_by_domain_substring() {
        let mut cat = Category::new("E-Zone");
        cat.exclusion_keywords = vec!["openai".to_string()];
        cat.sender_patterns.exclude_domains = vec!["openai.com".to_string()];
        let cat = compiled(cat);

        // "email.openai.com" contains "openai.com"
        assert!(is_excluded(
            "ChatGPT <noreply@email.openai.com>",
            "Your portal login",
            "",
            &cat
        ));
        assert!(!is_excluded(
            "E-Zone <portal@ezone.sharda.ac.in>",
            "Your portal login",
            "",
            &cat
        ));
    }

    #[test]
    fn test_exclusion_keyword_in_subject() {
        let mut cat = Category::new("Placement");
        cat.exclusion_keywords = vec!["nptel course".to_string()];
        let cat = compiled(cat);

        assert!(is_excluded(
            "someone@example.com",
            "NPTEL Course registration closes today",
            "",
            &cat
        ));
    }

    #[test]
    fn test_exclusion_by_display_name() {
        let mut cat = Category::new("NPTEL");
        cat.sender_patterns.exclude_names = vec!["servicenow".to_string()];
        let cat = compiled(cat);

        assert!(is_excluded(
            "ServiceNow University <no-reply@signonmail.servicenow.com>",
            "Learning content assigned",
            "",
            &cat
        ));
    }
}
