//! Classification orchestration.
//!
//! Sequences the signal sources under a fixed priority protocol: explicit
//! category mention in the subject, then label mappings, then tiered
//! category evaluation combining sender patterns and keyword scoring, then
//! candidate resolution with fallback. Classification is total: every
//! message gets exactly one result, and internal failures surface only as a
//! degraded fallback result, never as an error to the caller.

use crate::cache::TtlCache;
use crate::category::{
    method, Category, ClassificationResult, Evidence, LabelMapping, Message, PriorityTier,
};
use crate::config::ClassifierConfig;
use crate::keywords;
use crate::labels::resolve_labels;
use crate::registry::{CategoryRegistry, CompiledCategory};
use crate::sender::{self, sender_domain};
use std::sync::Arc;
use std::time::Duration;

/// Read-only view of the external category/mapping store. Implementations
/// are expected to be safe to call repeatedly; the classifier caches the
/// snapshots it gets back.
pub trait CategoryStore: Send + Sync {
    fn categories(&self, scope: &str) -> anyhow::Result<Vec<Category>>;
    fn label_mappings(&self, scope: &str) -> anyhow::Result<Vec<LabelMapping>>;
}

/// Store backed by in-process vectors. Serves the CLI and tests; a real
/// deployment implements `CategoryStore` against its own persistence.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub categories: Vec<Category>,
    pub mappings: Vec<LabelMapping>,
}

impl InMemoryStore {
    pub fn new(categories: Vec<Category>, mappings: Vec<LabelMapping>) -> Self {
        InMemoryStore {
            categories,
            mappings,
        }
    }
}

impl CategoryStore for InMemoryStore {
    fn categories(&self, _scope: &str) -> anyhow::Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    fn label_mappings(&self, _scope: &str) -> anyhow::Result<Vec<LabelMapping>> {
        Ok(self.mappings.clone())
    }
}

/// Where a candidate's evidence came from; sender evidence outranks keyword
/// evidence inside the tie margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateSource {
    Sender,
    Keyword,
}

#[derive(Debug, Clone)]
struct Candidate {
    result: ClassificationResult,
    source: CandidateSource,
}

pub struct Classifier {
    store: Arc<dyn CategoryStore>,
    config: ClassifierConfig,
    category_cache: TtlCache<CategoryRegistry>,
    mapping_cache: TtlCache<Vec<LabelMapping>>,
}

impl Classifier {
    pub fn new(store: Arc<dyn CategoryStore>, config: ClassifierConfig) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        Classifier {
            store,
            config,
            category_cache: TtlCache::new(ttl),
            mapping_cache: TtlCache::new(ttl),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one message. Total: never fails, never returns nothing.
    pub fn classify(&self, message: &Message, scope: &str) -> ClassificationResult {
        match self.try_classify(message, scope) {
            Ok(result) => result,
            Err(e) => {
                log::error!("classification failed for '{}': {e:#}", message.subject);
                ClassificationResult::new(
                    &self.config.fallback_category,
                    self.config.fallback_confidence,
                    method::ERROR,
                )
                .with_evidence(Evidence {
                    value: Some(e.to_string()),
                    ..Default::default()
                })
            }
        }
    }

    /// Classify a batch of messages. Results correspond to the input order.
    pub fn classify_batch(&self, messages: &[Message], scope: &str) -> Vec<ClassificationResult> {
        messages
            .iter()
            .map(|message| self.classify(message, scope))
            .collect()
    }

    /// Must be called by the mutation layer after any category write.
    pub fn invalidate_category_cache(&self, scope: Option<&str>) {
        self.category_cache.invalidate(scope);
    }

    /// Must be called by the mutation layer after any mapping write.
    pub fn invalidate_label_mapping_cache(&self, scope: Option<&str>) {
        self.mapping_cache.invalidate(scope);
    }

    fn registry(&self, scope: &str) -> anyhow::Result<Arc<CategoryRegistry>> {
        self.category_cache.get_or_insert_with(scope, || {
            self.store
                .categories(scope)
                .map(CategoryRegistry::compile)
        })
    }

    fn mappings(&self, scope: &str) -> anyhow::Result<Arc<Vec<LabelMapping>>> {
        self.mapping_cache
            .get_or_insert_with(scope, || self.store.label_mappings(scope))
    }

    fn try_classify(&self, message: &Message, scope: &str) -> anyhow::Result<ClassificationResult> {
        let registry = self.registry(scope)?;

        // An empty category list is "no match", not an error.
        if registry.is_empty() {
            log::debug!("no categories in scope '{scope}', using fallback");
            return Ok(self.fallback(method::NO_MATCH));
        }

        // Step 1: explicit category mention in the subject beats everything.
        if let Some(result) = self.match_subject_alias(message, &registry) {
            return Ok(result);
        }

        // Step 2: provider label mappings.
        if !message.labels.is_empty() {
            let mappings = self.mappings(scope)?;
            if let Some(result) = resolve_labels(&message.labels, &mappings, &self.config) {
                log::debug!("label match: '{}' -> {}", message.subject, result.label);
                return Ok(result);
            }
        }

        // Step 3: tiered evaluation of sender patterns and keyword scores.
        match self.evaluate_tiers(message, &registry)? {
            TierOutcome::Immediate(result) => Ok(result),
            TierOutcome::Candidates(candidates) => Ok(self.resolve_candidates(message, candidates)),
        }
    }

    fn fallback(&self, tag: &str) -> ClassificationResult {
        ClassificationResult::new(
            &self.config.fallback_category,
            self.config.fallback_confidence,
            tag,
        )
    }

    /// First category whose subject alias appears in the subject as a whole
    /// word wins, in registry order.
    fn match_subject_alias(
        &self,
        message: &Message,
        registry: &CategoryRegistry,
    ) -> Option<ClassificationResult> {
        if message.subject.is_empty() {
            return None;
        }
        for category in registry.categories() {
            for alias in &category.subject_aliases {
                if alias.is_match(&message.subject) {
                    log::debug!(
                        "subject '{}' names category '{}' explicitly",
                        message.subject,
                        category.def.name
                    );
                    return Some(
                        ClassificationResult::new(
                            &category.def.name,
                            self.config.subject_keyword_confidence,
                            method::SUBJECT_CATEGORY_KEYWORD,
                        )
                        .with_evidence(Evidence::pattern(alias.as_str(), &message.subject)),
                    );
                }
            }
        }
        None
    }

    /// Order categories high -> normal -> low, applying promotion rules
    /// within each tier. Promotions are evaluated once per message and only
    /// affect first-match order, never which categories qualify.
    fn tier_order<'a>(
        &self,
        message: &Message,
        registry: &'a CategoryRegistry,
    ) -> Vec<&'a CompiledCategory> {
        let from_lower = message.from.to_lowercase();
        let promoted: Vec<&str> = self
            .config
            .promotions
            .iter()
            .filter(|rule| {
                rule.sender_contains
                    .iter()
                    .any(|needle| from_lower.contains(needle.as_str()))
            })
            .map(|rule| rule.category.as_str())
            .collect();

        let mut ordered = Vec::with_capacity(registry.len());
        for tier in [PriorityTier::High, PriorityTier::Normal, PriorityTier::Low] {
            let members = registry
                .categories()
                .iter()
                .filter(|c| c.def.priority == tier);
            if promoted.is_empty() {
                ordered.extend(members);
                continue;
            }
            let mut front = Vec::new();
            let mut rest = Vec::new();
            for category in members {
                match promoted.iter().position(|name| *name == category.def.name) {
                    Some(rank) => front.push((rank, category)),
                    None => rest.push(category),
                }
            }
            front.sort_by_key(|(rank, _)| *rank);
            ordered.extend(front.into_iter().map(|(_, c)| c));
            ordered.extend(rest);
        }
        ordered
    }

    fn evaluate_tiers(
        &self,
        message: &Message,
        registry: &CategoryRegistry,
    ) -> anyhow::Result<TierOutcome> {
        let mut candidates: Vec<Candidate> = Vec::new();

        for category in self.tier_order(message, registry) {
            // Exclusions run first: a vetoed category can never be chosen.
            if sender::is_excluded(&message.from, &message.subject, &message.snippet, category) {
                log::debug!(
                    "category '{}' excluded for '{}'",
                    category.def.name,
                    message.subject
                );
                continue;
            }

            if let Some(hit) = sender::match_sender(&message.from, category, &self.config) {
                let result = ClassificationResult::new(&category.def.name, hit.confidence, hit.method)
                    .with_evidence(hit.evidence);
                // Trusted organizational senders are never overridden by
                // coincidental keyword noise.
                if category.def.trust_on_sender
                    && hit.confidence >= self.config.sender_trust_threshold
                {
                    log::debug!(
                        "trusted sender match: '{}' -> {} ({:.2})",
                        message.from,
                        result.label,
                        result.confidence
                    );
                    return Ok(TierOutcome::Immediate(result));
                }
                candidates.push(Candidate {
                    result,
                    source: CandidateSource::Sender,
                });
            }

            let scored = keywords::score(message, category);
            if scored.matched() {
                let confidence = keywords::confidence(
                    scored.raw_score,
                    category.def.weight,
                    self.config.keyword_scale,
                    self.config.keyword_floor,
                    self.config.keyword_ceiling,
                );
                let tag = if scored.matched_phrases.is_empty() {
                    method::KEYWORD
                } else {
                    method::KEYWORD_PHRASE
                };
                candidates.push(Candidate {
                    result: ClassificationResult::new(&category.def.name, confidence, tag)
                        .with_evidence(Evidence {
                            pattern: None,
                            value: None,
                            keywords: scored.matched_keywords,
                            phrases: scored.matched_phrases,
                        }),
                    source: CandidateSource::Keyword,
                });
            }
        }

        Ok(TierOutcome::Candidates(candidates))
    }

    fn resolve_candidates(
        &self,
        message: &Message,
        candidates: Vec<Candidate>,
    ) -> ClassificationResult {
        if candidates.is_empty() {
            // Recognized sending system with no categorized content still
            // gets a confident fallback rather than a shrug.
            if let Some(domain) = sender_domain(&message.from) {
                let known = self
                    .config
                    .known_system_domains
                    .iter()
                    .find(|pattern| domain == **pattern || domain.contains(pattern.as_str()));
                if let Some(pattern) = known {
                    log::debug!("known system sender '{domain}', assigning fallback at high confidence");
                    return ClassificationResult::new(
                        &self.config.fallback_category,
                        self.config.known_sender_confidence,
                        method::KNOWN_SENDER,
                    )
                    .with_evidence(Evidence::pattern(pattern, &domain));
                }
            }
            log::debug!("no match for '{}', using fallback", message.subject);
            return self.fallback(method::NO_MATCH);
        }

        // Single max-scan with a deterministic ordering: confidence decides
        // outside the tie margin, sender evidence beats keyword evidence
        // inside it, and the earliest candidate wins otherwise. Candidate
        // order is itself deterministic (tier order), so repeated calls
        // produce identical results.
        let margin = self.config.tie_margin;
        let mut best = &candidates[0];
        for candidate in &candidates[1..] {
            let outranks = if (candidate.result.confidence - best.result.confidence).abs() > margin
            {
                candidate.result.confidence > best.result.confidence
            } else {
                candidate.source == CandidateSource::Sender
                    && best.source == CandidateSource::Keyword
            };
            if outranks {
                best = candidate;
            }
        }

        // Low-confidence keyword matches are never trusted alone.
        if best.result.confidence < self.config.acceptance_floor {
            log::debug!(
                "top candidate {} ({:.2}) below acceptance floor, using fallback",
                best.result.label,
                best.result.confidence
            );
            return self.fallback(method::NO_MATCH);
        }

        log::debug!(
            "classified '{}' -> {} ({:.2}) via {}",
            message.subject,
            best.result.label,
            best.result.confidence,
            best.result.method
        );
        best.result.clone()
    }
}

enum TierOutcome {
    Immediate(ClassificationResult),
    Candidates(Vec<Candidate>),
}
