use std::collections::HashMap;

use regex::Regex;

/// A single weighted keyword/phrase entry, loaded from the classifier's
/// keyword table (spec.md §4.F step 1).
#[derive(Debug, Clone)]
pub struct KeywordEntry {
    pub phrase: String,
    pub weight: f64,
    pattern: Regex,
}

impl KeywordEntry {
    pub fn new(phrase: impl Into<String>, weight: f64) -> Self {
        let phrase = phrase.into();
        let escaped = regex::escape(&phrase);
        let pattern = Regex::new(&format!(r"(?i)\b{escaped}\b")).expect("valid keyword regex");
        Self {
            phrase,
            weight,
            pattern,
        }
    }

    fn matches(&self, haystack: &str) -> bool {
        self.pattern.is_match(haystack)
    }
}

/// Case-insensitive, token-boundary-aware keyword matcher producing a
/// clipped [-1, 1] score by summing the weights of every matching phrase
/// (spec.md §4.F step 1).
pub struct KeywordMatcher {
    entries: Vec<KeywordEntry>,
}

impl KeywordMatcher {
    pub fn new(entries: Vec<KeywordEntry>) -> Self {
        Self { entries }
    }

    pub fn from_weights(weights: HashMap<String, f64>) -> Self {
        let entries = weights
            .into_iter()
            .map(|(phrase, weight)| KeywordEntry::new(phrase, weight))
            .collect();
        Self::new(entries)
    }

    /// Returns the clipped aggregate score plus the list of phrases that
    /// matched, for downstream logging/classification-summary purposes.
    pub fn score(&self, text: &str) -> (f64, Vec<String>) {
        let mut total = 0.0;
        let mut matched = Vec::new();
        for entry in &self.entries {
            if entry.matches(text) {
                total += entry.weight;
                matched.push(entry.phrase.clone());
            }
        }
        (total.clamp(-1.0, 1.0), matched)
    }
}
