use regex::Regex;

use super::text::fold;
use crate::models::{ClassifiedMessage, Intent, Vocabulary};

struct IntentGroup {
    intent: Intent,
    patterns: Vec<Regex>,
}

/// Ordered intent table. Group order is priority.
pub struct IntentClassifier {
    groups: Vec<IntentGroup>,
}

impl IntentClassifier {
    pub fn from_vocabulary(vocabulary: &Vocabulary) -> anyhow::Result<Self> {
        let groups = vocabulary
            .intents
            .iter()
            .map(|group| {
                let patterns = group
                    .patterns
                    .iter()
                    .map(|p| Regex::new(&vocabulary.expand_pattern(p)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(IntentGroup {
                    intent: group.intent,
                    patterns,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { groups })
    }

    /// Patterns run against the folded text; the first group with any match
    /// wins and nothing after it is evaluated.
    pub fn classify(&self, cleaned_text: &str) -> ClassifiedMessage {
        let folded = fold(cleaned_text);
        let intent = self
            .groups
            .iter()
            .find(|group| group.patterns.iter().any(|p| p.is_match(&folded)))
            .map(|group| group.intent)
            .unwrap_or(Intent::Unclassified);

        ClassifiedMessage {
            cleaned_text: cleaned_text.to_string(),
            intent,
        }
    }
}
