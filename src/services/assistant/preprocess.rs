use regex::Regex;

use super::text::{collapse_whitespace, fold, trim_punctuation};
use crate::models::Vocabulary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preprocessed {
    /// No trigger token; the assistant stays silent.
    NotAddressed,
    /// Addressed, but nothing beyond a greeting (or nothing at all).
    Greeting,
    /// Lower-cased request with triggers and boilerplate removed.
    Command(String),
}

pub struct Preprocessor {
    triggers: Vec<String>,
    leading_trigger: Regex,
    greetings: Vec<Vec<String>>,
    courtesy_suffixes: Vec<Vec<String>>,
}

impl Preprocessor {
    pub fn from_vocabulary(vocabulary: &Vocabulary) -> anyhow::Result<Self> {
        let mut triggers: Vec<String> = vocabulary
            .triggers
            .iter()
            .map(|t| fold(t.trim()))
            .filter(|t| !t.is_empty())
            .collect();
        // Longest first so "@arcana" wins over "arcana" in the alternation.
        triggers.sort_by_key(|t| std::cmp::Reverse(t.len()));

        let alternation = triggers
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let leading_trigger = Regex::new(&format!(r"(?i)^\s*(?:{alternation})\b\s*[:,\-–—]?\s*"))?;

        Ok(Self {
            triggers,
            leading_trigger,
            greetings: phrase_list(&vocabulary.greetings),
            courtesy_suffixes: phrase_list(&vocabulary.courtesy_suffixes),
        })
    }

    pub fn preprocess(&self, raw: &str) -> Preprocessed {
        if !self.is_addressed(raw) {
            return Preprocessed::NotAddressed;
        }

        let stripped = self.leading_trigger.replace(raw, "");
        let tokens: Vec<String> = stripped
            .split_whitespace()
            .filter(|token| !self.is_trigger(&fold(trim_punctuation(token))))
            .map(|token| token.to_lowercase())
            .collect();

        let mut tokens: &[String] = &tokens;
        while let Some(rest) = strip_prefix_phrase(tokens, &self.greetings) {
            tokens = rest;
        }
        while let Some(rest) = strip_suffix_phrase(tokens, &self.courtesy_suffixes) {
            tokens = rest;
        }

        let cleaned = collapse_whitespace(&tokens.join(" "));
        let cleaned = trim_punctuation(&cleaned);
        if cleaned.is_empty() {
            return Preprocessed::Greeting;
        }
        Preprocessed::Command(cleaned.to_string())
    }

    fn is_addressed(&self, raw: &str) -> bool {
        fold(raw)
            .split(|c: char| !(c.is_alphanumeric() || c == '@'))
            .any(|token| self.is_trigger(token))
    }

    fn is_trigger(&self, token: &str) -> bool {
        !token.is_empty() && self.triggers.iter().any(|t| t == token)
    }
}

fn phrase_list(phrases: &[String]) -> Vec<Vec<String>> {
    phrases
        .iter()
        .map(|p| fold(p).split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .filter(|p| !p.is_empty())
        .collect()
}

fn bare(token: &str) -> String {
    fold(trim_punctuation(token))
}

/// Drops the first phrase found at the start of `tokens`, along with any
/// punctuation-only tokens around it.
fn strip_prefix_phrase<'a>(tokens: &'a [String], phrases: &[Vec<String>]) -> Option<&'a [String]> {
    let skip_blank = |t: &'a [String]| {
        let n = t.iter().take_while(|tok| bare(tok).is_empty()).count();
        &t[n..]
    };
    let tokens = skip_blank(tokens);
    phrases.iter().find_map(|phrase| {
        if phrase.len() > tokens.len() {
            return None;
        }
        let matches = tokens
            .iter()
            .zip(phrase.iter())
            .all(|(tok, word)| bare(tok) == *word);
        matches.then(|| skip_blank(&tokens[phrase.len()..]))
    })
}

fn strip_suffix_phrase<'a>(tokens: &'a [String], phrases: &[Vec<String>]) -> Option<&'a [String]> {
    let end = tokens.len() - tokens.iter().rev().take_while(|tok| bare(tok).is_empty()).count();
    let tokens = &tokens[..end];
    phrases.iter().find_map(|phrase| {
        if phrase.len() > tokens.len() {
            return None;
        }
        let start = tokens.len() - phrase.len();
        let matches = tokens[start..]
            .iter()
            .zip(phrase.iter())
            .all(|(tok, word)| bare(tok) == *word);
        matches.then(|| &tokens[..start])
    })
}
