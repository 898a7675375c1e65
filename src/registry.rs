//! Compiled category snapshots.
//!
//! Categories arrive from the external store as plain data. The registry
//! compiles each snapshot once: word-boundary regexes for every keyword and
//! subject alias, case-insensitive specific-sender regexes, and lowercased
//! copies of phrase, exclusion and pattern lists. Categories keep their
//! store-supplied order so matching order is reproducible; the orchestrator
//! imposes tier ordering on top.

use crate::category::Category;
use regex::Regex;
use regex::RegexBuilder;

/// A keyword with its precompiled whole-word matcher.
#[derive(Debug, Clone)]
pub struct CompiledKeyword {
    pub keyword: String,
    pub regex: Regex,
}

/// One category with every pattern compiled and normalized.
#[derive(Debug, Clone)]
pub struct CompiledCategory {
    pub def: Category,
    pub primary_keywords: Vec<CompiledKeyword>,
    pub secondary_keywords: Vec<CompiledKeyword>,
    /// Lowercased literal phrases, counted as substrings.
    pub phrases: Vec<String>,
    /// Lowercased exclusion terms checked against sender+subject+snippet.
    pub exclusion_keywords: Vec<String>,
    /// Whole-word matchers for the category's subject aliases.
    pub subject_aliases: Vec<Regex>,
    pub domains: Vec<String>,
    pub names: Vec<String>,
    pub exclude_domains: Vec<String>,
    pub exclude_names: Vec<String>,
    pub specific_sender_regexes: Vec<Regex>,
}

/// Compile a case-insensitive whole-word matcher for a literal term.
/// Word-boundary anchoring keeps "job" from matching inside "jobless".
fn word_regex(term: &str) -> Option<Regex> {
    let pattern = format!(r"\b{}\b", regex::escape(&term.to_lowercase()));
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::warn!("skipping unmatchable keyword '{term}': {e}");
            None
        }
    }
}

fn compile_keywords(terms: &[String]) -> Vec<CompiledKeyword> {
    terms
        .iter()
        .filter_map(|term| {
            word_regex(term).map(|regex| CompiledKeyword {
                keyword: term.clone(),
                regex,
            })
        })
        .collect()
}

fn lowercase_all(terms: &[String]) -> Vec<String> {
    terms.iter().map(|t| t.to_lowercase()).collect()
}

impl CompiledCategory {
    pub fn compile(def: Category) -> Self {
        let specific_sender_regexes = def
            .sender_patterns
            .specific_sender_regexes
            .iter()
            .filter_map(|pattern| {
                match RegexBuilder::new(pattern).case_insensitive(true).build() {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        // A malformed pattern disables that one rule only.
                        log::warn!(
                            "skipping invalid sender regex '{pattern}' in category '{}': {e}",
                            def.name
                        );
                        None
                    }
                }
            })
            .collect();

        CompiledCategory {
            primary_keywords: compile_keywords(&def.primary_keywords),
            secondary_keywords: compile_keywords(&def.secondary_keywords),
            phrases: lowercase_all(&def.phrases),
            exclusion_keywords: lowercase_all(&def.exclusion_keywords),
            subject_aliases: def
                .subject_aliases
                .iter()
                .filter_map(|alias| word_regex(alias))
                .collect(),
            domains: lowercase_all(&def.sender_patterns.domains),
            names: lowercase_all(&def.sender_patterns.names),
            exclude_domains: lowercase_all(&def.sender_patterns.exclude_domains),
            exclude_names: lowercase_all(&def.sender_patterns.exclude_names),
            specific_sender_regexes,
            def,
        }
    }
}

/// One immutable snapshot of all categories, compiled and order-preserving.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: Vec<CompiledCategory>,
}

impl CategoryRegistry {
    pub fn compile(definitions: Vec<Category>) -> Self {
        let categories = definitions
            .into_iter()
            .map(CompiledCategory::compile)
            .collect::<Vec<_>>();
        log::debug!("compiled registry snapshot with {} categories", categories.len());
        CategoryRegistry { categories }
    }

    pub fn categories(&self) -> &[CompiledCategory] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    #[test]
    fn test_word_boundary_compilation() {
        let regex = word_regex("job").unwrap();
        assert!(regex.is_match("a great Job offer"));
        assert!(!regex.is_match("jobless recovery"));
    }

    #[test]
    fn test_invalid_sender_regex_is_skipped() {
        let mut cat = Category::new("Broken");
        cat.sender_patterns.specific_sender_regexes =
            vec!["[unclosed".to_string(), r"dr\.\s+\w+".to_string()];
        let compiled = CompiledCategory::compile(cat);
        assert_eq!(compiled.specific_sender_regexes.len(), 1);
    }

    #[test]
    fn test_registry_preserves_order() {
        let registry = CategoryRegistry::compile(vec![
            Category::new("B"),
            Category::new("A"),
            Category::new("C"),
        ]);
        let names: Vec<&str> = registry
            .categories()
            .iter()
            .map(|c| c.def.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_patterns_lowercased() {
        let mut cat = Category::new("X");
        cat.sender_patterns.domains = vec!["Sharda.AC.IN".to_string()];
        cat.exclusion_keywords = vec!["OpenAI".to_string()];
        let compiled = CompiledCategory::compile(cat);
        assert_eq!(compiled.domains, vec!["sharda.ac.in"]);
        assert_eq!(compiled.exclusion_keywords, vec!["openai"]);
    }
}
