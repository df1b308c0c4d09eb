//! Keyword sets backed by Aho-Corasick automata

use aho_corasick::AhoCorasick;
use chatsense_core::{Message, Result};

/// A named, case-insensitive keyword list.
///
/// Keywords are plain substrings, so `"man"` also hits `"manage"`; the
/// lists are tuned with that in mind.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    name: String,
    matcher: AhoCorasick,
    len: usize,
}

impl KeywordSet {
    /// Compile a keyword set
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Result<Self> {
        let name = name.into();
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(keywords)
            .map_err(|e| {
                chatsense_core::Error::internal(format!(
                    "Failed to build '{name}' keyword matcher: {e}"
                ))
            })?;

        Ok(Self {
            name,
            matcher,
            len: keywords.len(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when at least one keyword occurs in `text`
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    /// Every keyword occurrence in `text`, overlapping hits of distinct
    /// keywords included
    pub fn count_occurrences(&self, text: &str) -> usize {
        self.matcher.find_overlapping_iter(text).count()
    }

    /// Number of non-system messages containing at least one keyword
    pub fn matching_messages<'a>(&self, messages: impl IntoIterator<Item = &'a Message>) -> usize {
        messages
            .into_iter()
            .filter(|m| !m.is_system && self.matches(&m.text))
            .count()
    }

    /// Share of non-system messages (0-100) containing at least one keyword
    pub fn presence_percentage(&self, messages: &[Message]) -> f64 {
        let total = messages.iter().filter(|m| !m.is_system).count();
        percentage(self.matching_messages(messages), total)
    }

    /// Total keyword occurrences across all non-system messages
    pub fn total_occurrences(&self, messages: &[Message]) -> usize {
        messages
            .iter()
            .filter(|m| !m.is_system)
            .map(|m| self.count_occurrences(&m.text))
            .sum()
    }
}

/// `count / total * 100`, zero for an empty denominator
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
