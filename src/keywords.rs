//! Multi-tier weighted keyword and phrase scoring.
//!
//! Each keyword occurrence is counted per content field with whole-word
//! matching and contributes `count x tier weight x field weight`. Phrases
//! are literal case-insensitive occurrences over the concatenation of all
//! fields, each contributing the phrase weight.

use crate::category::Message;
use crate::registry::{CompiledCategory, CompiledKeyword};

/// Content-location weights: the subject line is the strongest signal.
pub const SUBJECT_WEIGHT: f64 = 2.0;
pub const SNIPPET_WEIGHT: f64 = 1.5;
pub const BODY_WEIGHT: f64 = 1.0;

/// Keyword-tier weights.
pub const PRIMARY_WEIGHT: f64 = 1.2;
pub const SECONDARY_WEIGHT: f64 = 1.0;
pub const PHRASE_WEIGHT: f64 = 1.5;

/// Raw scoring outcome for one (message, category) pair.
#[derive(Debug, Clone, Default)]
pub struct ScoreResult {
    pub raw_score: f64,
    pub matched_keywords: Vec<String>,
    pub matched_phrases: Vec<String>,
}

impl ScoreResult {
    pub fn matched(&self) -> bool {
        self.raw_score > 0.0
    }
}

/// Count non-overlapping literal occurrences of `needle` in `haystack`.
/// Both are expected to be lowercased already.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

fn score_tier(
    keywords: &[CompiledKeyword],
    tier_weight: f64,
    fields: &[(&str, f64)],
    matched: &mut Vec<String>,
) -> f64 {
    let mut score = 0.0;
    for keyword in keywords {
        let mut keyword_score = 0.0;
        for (text, field_weight) in fields {
            let count = keyword.regex.find_iter(text).count();
            if count > 0 {
                keyword_score += count as f64 * tier_weight * field_weight;
            }
        }
        if keyword_score > 0.0 {
            matched.push(keyword.keyword.clone());
            score += keyword_score;
        }
    }
    score
}

/// Score a message against one category's keyword and phrase lists.
pub fn score(message: &Message, category: &CompiledCategory) -> ScoreResult {
    let fields: [(&str, f64); 3] = [
        (message.subject.as_str(), SUBJECT_WEIGHT),
        (message.snippet.as_str(), SNIPPET_WEIGHT),
        (message.body.as_str(), BODY_WEIGHT),
    ];

    let mut matched_keywords = Vec::new();
    let mut raw_score = 0.0;

    raw_score += score_tier(
        &category.primary_keywords,
        PRIMARY_WEIGHT,
        &fields,
        &mut matched_keywords,
    );
    raw_score += score_tier(
        &category.secondary_keywords,
        SECONDARY_WEIGHT,
        &fields,
        &mut matched_keywords,
    );

    let mut matched_phrases = Vec::new();
    if !category.phrases.is_empty() {
        let all_text = format!(
            "{} {} {}",
            message.subject, message.snippet, message.body
        )
        .to_lowercase();
        for phrase in &category.phrases {
            let count = count_occurrences(&all_text, phrase);
            if count > 0 {
                matched_phrases.push(phrase.clone());
                raw_score += count as f64 * PHRASE_WEIGHT;
            }
        }
    }

    if raw_score > 0.0 {
        log::debug!(
            "category '{}' keyword score {raw_score:.2} ({} keywords, {} phrases)",
            category.def.name,
            matched_keywords.len(),
            matched_phrases.len()
        );
    }

    ScoreResult {
        raw_score,
        matched_keywords,
        matched_phrases,
    }
}

/// Derive a confidence from a raw score: scale by the category weight,
/// divide by `scale`, clamp into [floor, ceiling], round to two decimals.
/// Keyword-only evidence never reaches the band reserved for sender and
/// label evidence.
pub fn confidence(raw_score: f64, category_weight: f64, scale: f64, floor: f64, ceiling: f64) -> f64 {
    let adjusted = raw_score * category_weight / scale;
    let clamped = adjusted.clamp(floor, ceiling);
    (clamped * 100.0).round() / 100.0
}
