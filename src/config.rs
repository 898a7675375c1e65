use serde::{Deserialize, Serialize};

/// Promotes a category to the front of its priority tier when any needle
/// appears in the lowercased `From` string. Evaluated once per message;
/// affects first-match order within a tier, never correctness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionRule {
    pub sender_contains: Vec<String>,
    pub category: String,
}

/// Tuning knobs for the classification pipeline. Every confidence level and
/// threshold the orchestrator uses is a named value here, loaded once and
/// treated as immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Category returned when no rule produces an acceptable match.
    pub fallback_category: String,
    pub fallback_confidence: f64,
    /// Confidence for label-mapping matches.
    pub label_confidence: f64,
    pub specific_sender_confidence: f64,
    pub sender_domain_confidence: f64,
    pub sender_name_confidence: f64,
    /// Confidence when the subject contains a category alias as a whole word.
    pub subject_keyword_confidence: f64,
    /// Lower clamp bound for keyword confidence: any nonzero score yields
    /// at least this.
    pub keyword_floor: f64,
    /// Acceptance floor: a top candidate below this is discarded in favor
    /// of the fallback. Equal to keyword_floor by default.
    pub acceptance_floor: f64,
    /// Keyword-only evidence saturates here; the ceiling above is reserved
    /// for sender and label evidence.
    pub keyword_ceiling: f64,
    /// Divisor converting a weighted raw score into a confidence.
    pub keyword_scale: f64,
    /// Minimum sender-match confidence for the trust-on-sender short-circuit.
    pub sender_trust_threshold: f64,
    /// Confidence window within which sender evidence outranks keyword
    /// evidence during candidate resolution.
    pub tie_margin: f64,
    /// Domains of recognized sending systems that belong to no category;
    /// messages from them fall back at known_sender_confidence.
    pub known_system_domains: Vec<String>,
    pub known_sender_confidence: f64,
    pub promotions: Vec<PromotionRule>,
    /// Snapshot time-to-live for category and mapping caches, in seconds.
    pub cache_ttl_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            fallback_category: "Other".to_string(),
            fallback_confidence: 0.30,
            label_confidence: 0.95,
            specific_sender_confidence: 0.95,
            sender_domain_confidence: 0.90,
            sender_name_confidence: 0.90,
            subject_keyword_confidence: 0.98,
            keyword_floor: 0.75,
            acceptance_floor: 0.75,
            keyword_ceiling: 0.90,
            keyword_scale: 10.0,
            sender_trust_threshold: 0.90,
            tie_margin: 0.05,
            known_system_domains: vec![
                "service-now.com".to_string(),
                "servicenow.com".to_string(),
                "nowlearning.com".to_string(),
            ],
            known_sender_confidence: 0.90,
            promotions: vec![
                PromotionRule {
                    sender_contains: vec![
                        "'promotions' via".to_string(),
                        "promotions via".to_string(),
                    ],
                    category: "Promotions".to_string(),
                },
                PromotionRule {
                    sender_contains: vec![
                        "what's happening".to_string(),
                        "whats happening".to_string(),
                    ],
                    category: "Whats happening".to_string(),
                },
                PromotionRule {
                    sender_contains: vec![
                        "hod ".to_string(),
                        "head of department".to_string(),
                        "head of dept".to_string(),
                    ],
                    category: "HOD".to_string(),
                },
            ],
            cache_ttl_secs: 300,
        }
    }
}

impl ClassifierConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ClassifierConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = ClassifierConfig::default();
        assert_eq!(config.fallback_category, "Other");
        assert_eq!(config.fallback_confidence, 0.30);
        assert_eq!(config.keyword_floor, 0.75);
        assert_eq!(config.acceptance_floor, 0.75);
        assert_eq!(config.keyword_ceiling, 0.90);
        assert_eq!(config.tie_margin, 0.05);
        assert_eq!(config.cache_ttl_secs, 300);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: ClassifierConfig =
            serde_yaml::from_str("fallback_category: Unsorted\ntie_margin: 0.1\n").unwrap();
        assert_eq!(config.fallback_category, "Unsorted");
        assert_eq!(config.tie_margin, 0.1);
        assert_eq!(config.label_confidence, 0.95);
        assert!(!config.promotions.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let config = ClassifierConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: ClassifierConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.known_system_domains, config.known_system_domains);
        assert_eq!(parsed.promotions.len(), config.promotions.len());
    }
}
