use std::collections::BTreeMap;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::Intent;

const BUILTIN_VOCABULARY: &str = include_str!("../../config/vocabulary.json");
const BOOKS_PLACEHOLDER: &str = "{books}";

/// Everything the engine matches against: triggers, the ordered intent table,
/// the synonym dictionary and the extraction patterns. Loaded from JSON so the
/// table can be versioned and extended without touching code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
    pub triggers: Vec<String>,
    #[serde(default)]
    pub greetings: Vec<String>,
    #[serde(default)]
    pub courtesy_suffixes: Vec<String>,
    /// Folded book names; `{books}` in an intent pattern expands to them.
    #[serde(default)]
    pub bible_books: Vec<String>,
    /// Order is priority: the first group with a matching pattern wins.
    pub intents: Vec<IntentPatterns>,
    /// Folded alias -> folded search variants.
    #[serde(default)]
    pub synonyms: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub filler_words: Vec<String>,
    #[serde(default)]
    pub song_select_patterns: Vec<String>,
    #[serde(default)]
    pub name_patterns: Vec<String>,
    #[serde(default)]
    pub name_stopwords: Vec<String>,
    #[serde(default)]
    pub scripture_topics: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentPatterns {
    pub intent: Intent,
    pub patterns: Vec<String>,
}

fn default_version() -> u32 {
    1
}

fn default_assistant_name() -> String {
    "ARCANA".to_string()
}

impl Vocabulary {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let vocabulary: Vocabulary = serde_json::from_str(json)?;
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// Reads the vocabulary at `path`, or the embedded default when unset.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read vocabulary file: {path}"))?;
                Self::from_json(&json)
                    .with_context(|| format!("invalid vocabulary file: {path}"))
            }
            None => Self::from_json(BUILTIN_VOCABULARY).context("invalid builtin vocabulary"),
        }
    }

    /// Alternation of the book names, longest first.
    pub fn books_alternation(&self) -> String {
        let mut names: Vec<&str> = self
            .bible_books
            .iter()
            .map(|b| b.trim())
            .filter(|b| !b.is_empty())
            .collect();
        names.sort_by_key(|b| std::cmp::Reverse(b.len()));
        let escaped: Vec<String> = names.into_iter().map(regex::escape).collect();
        format!("(?:{})", escaped.join("|"))
    }

    pub fn expand_pattern(&self, pattern: &str) -> String {
        if pattern.contains(BOOKS_PLACEHOLDER) {
            pattern.replace(BOOKS_PLACEHOLDER, &self.books_alternation())
        } else {
            pattern.to_string()
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.triggers.iter().all(|t| t.trim().is_empty()) {
            anyhow::bail!("vocabulary must define at least one trigger");
        }
        if self.intents.iter().any(|g| g.intent == Intent::Unclassified) {
            anyhow::bail!("'unclassified' is the fallback intent and cannot have patterns");
        }

        let groups = self.intents.iter().flat_map(|g| g.patterns.iter());
        if self.bible_books.iter().all(|b| b.trim().is_empty())
            && groups.clone().any(|p| p.contains(BOOKS_PLACEHOLDER))
        {
            anyhow::bail!("patterns use {BOOKS_PLACEHOLDER} but no bible_books are defined");
        }

        let extraction = self
            .song_select_patterns
            .iter()
            .chain(self.name_patterns.iter());
        for pattern in groups.chain(extraction) {
            regex::Regex::new(&self.expand_pattern(pattern))
                .with_context(|| format!("invalid pattern: {pattern}"))?;
        }

        for pattern in self.song_select_patterns.iter().chain(self.name_patterns.iter()) {
            let has_name = regex::Regex::new(pattern)?
                .capture_names()
                .any(|n| n == Some("name"));
            if !has_name {
                anyhow::bail!("extraction pattern is missing a 'name' group: {pattern}");
            }
        }
        Ok(())
    }
}
