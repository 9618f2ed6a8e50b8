use std::collections::{BTreeMap, HashSet};

use regex::Regex;

use super::text::{collapse_whitespace, contains_words, fold, trim_punctuation, words};
use crate::models::{DirectoryEntry, NameMatch, Vocabulary};

/// Whole search term found in the combined name.
const FULL_TERM_SCORE: u32 = 100;
/// One word of a multi-word term found in the first or last name.
const WORD_SCORE: u32 = 10;
/// Terms this short only count on word boundaries.
const SHORT_TERM_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    NotFound,
    Resolved(NameMatch),
    /// Several plausible people; the caller asks the user to pick one.
    Ambiguous(Vec<NameMatch>),
}

pub struct EntityResolver {
    synonyms: BTreeMap<String, Vec<String>>,
    name_patterns: Vec<Regex>,
    stopwords: HashSet<String>,
}

struct FoldedName {
    first: String,
    last: String,
    full: String,
}

impl FoldedName {
    fn of(entry: &DirectoryEntry) -> Self {
        let first = collapse_whitespace(&fold(&entry.first_name));
        let last = collapse_whitespace(&fold(&entry.last_name));
        let full = collapse_whitespace(&format!("{first} {last}"));
        Self { first, last, full }
    }
}

impl EntityResolver {
    pub fn from_vocabulary(vocabulary: &Vocabulary) -> anyhow::Result<Self> {
        let synonyms = vocabulary
            .synonyms
            .iter()
            .map(|(alias, variants)| {
                let variants = variants
                    .iter()
                    .map(|v| collapse_whitespace(&fold(v)))
                    .filter(|v| !v.is_empty())
                    .collect();
                (collapse_whitespace(&fold(alias)), variants)
            })
            .collect();
        let name_patterns = vocabulary
            .name_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let stopwords = vocabulary.name_stopwords.iter().map(|w| fold(w)).collect();

        Ok(Self {
            synonyms,
            name_patterns,
            stopwords,
        })
    }

    /// Pulls the person fragment out of a request such as
    /// "cuándo le toca a santana". The first pattern that yields a non-empty
    /// name wins.
    pub fn extract_name(&self, cleaned_text: &str) -> Option<String> {
        self.name_patterns.iter().find_map(|pattern| {
            let caps = pattern.captures(cleaned_text)?;
            let raw = trim_punctuation(caps.name("name")?.as_str());
            let kept: Vec<&str> = raw
                .split_whitespace()
                .map(trim_punctuation)
                .filter(|w| !w.is_empty() && !self.stopwords.contains(&fold(w)))
                .collect();
            (!kept.is_empty()).then(|| kept.join(" "))
        })
    }

    /// Search set for a fragment: the synonym variants when the fragment is a
    /// known alias, otherwise the folded fragment itself.
    pub fn search_terms(&self, fragment: &str) -> Vec<String> {
        let key = collapse_whitespace(&fold(fragment));
        match self.synonyms.get(&key) {
            Some(variants) if !variants.is_empty() => variants.clone(),
            _ if key.is_empty() => Vec::new(),
            _ => vec![key],
        }
    }

    pub fn resolve(&self, fragment: &str, entries: &[DirectoryEntry]) -> Resolution {
        let terms = self.search_terms(fragment);
        if terms.is_empty() {
            return Resolution::NotFound;
        }

        let mut candidates: Vec<(NameMatch, FoldedName)> = entries
            .iter()
            .filter_map(|entry| {
                let name = FoldedName::of(entry);
                let confidence = terms.iter().map(|t| score_term(&name, t)).max().unwrap_or(0);
                (confidence > 0).then(|| {
                    (
                        NameMatch {
                            entry: entry.clone(),
                            confidence,
                        },
                        name,
                    )
                })
            })
            .collect();

        candidates.sort_by(|(a, an), (b, bn)| {
            b.confidence
                .cmp(&a.confidence)
                .then_with(|| an.full.cmp(&bn.full))
        });

        match candidates.len() {
            0 => Resolution::NotFound,
            1 => Resolution::Resolved(candidates.remove(0).0),
            _ => {
                let strict: Vec<usize> = candidates
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, name))| terms.iter().any(|t| contains_full_term(name, t)))
                    .map(|(i, _)| i)
                    .collect();

                if let [only] = strict.as_slice() {
                    return Resolution::Resolved(candidates.swap_remove(*only).0);
                }

                tracing::debug!(
                    fragment,
                    candidates = candidates.len(),
                    "name resolution is ambiguous"
                );
                Resolution::Ambiguous(candidates.into_iter().map(|(m, _)| m).collect())
            }
        }
    }
}

fn contains_full_term(name: &FoldedName, term: &str) -> bool {
    if term.chars().count() <= SHORT_TERM_LEN {
        contains_words(&name.full, term)
    } else {
        name.full.contains(term)
    }
}

fn score_term(name: &FoldedName, term: &str) -> u32 {
    if contains_full_term(name, term) {
        return FULL_TERM_SCORE;
    }
    if term.chars().count() <= SHORT_TERM_LEN {
        return 0;
    }

    words(term)
        .into_iter()
        .filter(|word| {
            if word.chars().count() <= SHORT_TERM_LEN {
                contains_words(&name.first, word) || contains_words(&name.last, word)
            } else {
                name.first.contains(word) || name.last.contains(word)
            }
        })
        .count() as u32
        * WORD_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, first: &str, last: &str) -> DirectoryEntry {
        DirectoryEntry {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            role: None,
            voice_or_instrument: None,
            birth_date: None,
        }
    }

    fn roster() -> Vec<DirectoryEntry> {
        vec![
            entry("1", "José", "Pérez"),
            entry("2", "Josefina", "Ruiz"),
            entry("3", "Leo", "Martínez"),
            entry("4", "Carlos", "Valeon"),
            entry("5", "María", "Santana"),
            entry("6", "Pedro", "Santana"),
            entry("7", "Lucía", "Santana Gómez"),
            entry("8", "Guadalupe", "Ortiz"),
        ]
    }

    fn resolver() -> EntityResolver {
        EntityResolver::from_vocabulary(&Vocabulary::load(None).unwrap()).unwrap()
    }

    fn ids(resolution: &Resolution) -> Vec<String> {
        match resolution {
            Resolution::NotFound => vec![],
            Resolution::Resolved(m) => vec![m.entry.id.clone()],
            Resolution::Ambiguous(ms) => ms.iter().map(|m| m.entry.id.clone()).collect(),
        }
    }

    #[test]
    fn test_accents_do_not_matter() {
        let r = resolver();
        let with = r.resolve("josé", &roster());
        let without = r.resolve("jose", &roster());
        assert_eq!(ids(&with), ids(&without));
    }

    #[test]
    fn test_strict_pass_keeps_only_full_term_holder() {
        // "pedro sant" scores every Santana on "sant"; only Pedro holds the whole term.
        let r = resolver();
        match r.resolve("pedro sant", &roster()) {
            Resolution::Resolved(m) => {
                assert_eq!(m.entry.id, "6");
                assert_eq!(m.confidence, FULL_TERM_SCORE);
            }
            other => panic!("expected resolved, got {other:?}"),
        }
    }

    #[test]
    fn test_prefix_of_two_names_stays_ambiguous() {
        // "jose" is contained in both José and Josefina.
        let r = resolver();
        let resolution = r.resolve("jose", &roster());
        assert!(matches!(resolution, Resolution::Ambiguous(_)));
        let mut got = ids(&resolution);
        got.sort();
        assert_eq!(got, vec!["1", "2"]);
    }

    #[test]
    fn test_short_term_needs_word_boundary() {
        let r = resolver();
        // "leo" must not hit "Valeon".
        match r.resolve("leo", &roster()) {
            Resolution::Resolved(m) => assert_eq!(m.entry.id, "3"),
            other => panic!("expected resolved, got {other:?}"),
        }
        assert_eq!(r.resolve("eon", &roster()), Resolution::NotFound);
    }

    #[test]
    fn test_ambiguous_surname_returns_all_candidates() {
        let r = resolver();
        let resolution = r.resolve("Santana", &roster());
        let mut got = ids(&resolution);
        got.sort();
        assert!(matches!(resolution, Resolution::Ambiguous(_)));
        assert_eq!(got, vec!["5", "6", "7"]);
    }

    #[test]
    fn test_full_name_resolves_uniquely() {
        let r = resolver();
        assert_eq!(ids(&r.resolve("pedro santana", &roster())), vec!["6"]);
    }

    #[test]
    fn test_synonym_expands_search() {
        let r = resolver();
        assert_eq!(ids(&r.resolve("Lupita", &roster())), vec!["8"]);
        assert_eq!(ids(&r.resolve("pepe", &roster())), ids(&r.resolve("jose", &roster())));
    }

    #[test]
    fn test_unknown_name_not_found() {
        let r = resolver();
        assert_eq!(r.resolve("zacarías", &roster()), Resolution::NotFound);
        assert_eq!(r.resolve("   ", &roster()), Resolution::NotFound);
    }

    #[test]
    fn test_extract_name() {
        let r = resolver();
        assert_eq!(r.extract_name("cuándo le toca a santana?"), Some("santana".to_string()));
        assert_eq!(
            r.extract_name("cuándo le toca cantar a la hermana maría"),
            Some("maría".to_string())
        );
        assert_eq!(r.extract_name("turno de pedro santana"), Some("pedro santana".to_string()));
        assert_eq!(r.extract_name("cuándo le toca"), None);
    }
}
