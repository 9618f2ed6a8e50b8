use regex::Regex;

use crate::models::{BotResponse, Intent, Mood, Verse, Vocabulary};
use crate::services::assistant::replies::bold;
use crate::services::assistant::text::{capitalize, fold, trim_punctuation};
use crate::services::assistant::ChatEngine;

pub const FALLBACK_REFERENCE: &str = "Juan 3:16";
pub const FALLBACK_TEXT: &str = "Porque de tal manera amó Dios al mundo, que ha dado a su Hijo unigénito, para que todo aquel que en él cree, no se pierda, mas tenga vida eterna.";
pub const FALLBACK_TRANSLATION: &str = "Reina-Valera 1960";

pub fn fallback_verse() -> Verse {
    Verse {
        reference: FALLBACK_REFERENCE.to_string(),
        text: FALLBACK_TEXT.to_string(),
        translation_name: FALLBACK_TRANSLATION.to_string(),
    }
}

/// Finds Bible references and topics in cleaned text. References only
/// start at a known book name, so "a las 10:30" is never one.
pub struct ScriptureParser {
    chapter_of_book: Regex,
    book_chapter_verse: Regex,
    topic: Regex,
}

impl ScriptureParser {
    pub fn from_vocabulary(vocabulary: &Vocabulary) -> anyhow::Result<Self> {
        if vocabulary.bible_books.iter().all(|b| b.trim().is_empty()) {
            anyhow::bail!("vocabulary defines no bible_books");
        }
        let books = vocabulary.books_alternation();
        Ok(Self {
            chapter_of_book: Regex::new(&format!(
                r"\bcapitulo\s+(?P<chapter>\d{{1,3}})\s+de\s+(?P<book>(?:[1-3]\s*)?{books})\b"
            ))?,
            book_chapter_verse: Regex::new(&format!(
                r"\b(?P<book>(?:[1-3]\s*)?{books})\s+(?P<chapter>\d{{1,3}})(?:\s*:\s*(?P<verse>\d{{1,3}})(?:\s*-\s*(?P<end>\d{{1,3}}))?)?"
            ))?,
            topic: Regex::new(
                r"(?i)\b(?:sobre|acerca\s+del?|que\s+hablen?\s+del?|para|del?)\s+(?:(?:el|la|los|las)\s+)?(?P<topic>.+)$",
            )?,
        })
    }

    /// Normalised reference such as "1 Corintios 13:4-7" found in the text.
    pub fn extract_reference(&self, cleaned_text: &str) -> Option<String> {
        let folded = fold(cleaned_text);
        if let Some(caps) = self.chapter_of_book.captures(&folded) {
            return Some(format!("{} {}", book_name(&caps["book"]), &caps["chapter"]));
        }

        let caps = self.book_chapter_verse.captures(&folded)?;
        let mut reference = format!("{} {}", book_name(&caps["book"]), &caps["chapter"]);
        if let Some(verse) = caps.name("verse") {
            reference.push(':');
            reference.push_str(verse.as_str());
        }
        if let Some(end) = caps.name("end") {
            reference.push('-');
            reference.push_str(end.as_str());
        }
        Some(reference)
    }

    pub fn extract_topic(&self, cleaned_text: &str) -> Option<String> {
        let caps = self.topic.captures(cleaned_text)?;
        let topic = trim_punctuation(&caps["topic"]);
        (!topic.is_empty()).then(|| topic.to_string())
    }
}

fn book_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_verse(verse: &Verse) -> String {
    format!(
        "📖 {} ({})\n\n«{}»",
        bold(&verse.reference),
        verse.translation_name,
        verse.text.trim()
    )
}

impl ChatEngine {
    pub(crate) async fn handle_daily_verse(&self) -> BotResponse {
        let verse = match self.scripture.get_random_verse().await {
            Ok(verse) => verse,
            Err(e) => {
                tracing::warn!(error = %e, "scripture provider failed, using fallback verse");
                fallback_verse()
            }
        };
        BotResponse::new(
            Intent::ScriptureDaily,
            Mood::Happy,
            format!("✨ Versículo del día\n\n{}", format_verse(&verse)),
        )
    }

    pub(crate) async fn handle_specific_verse(&self, cleaned_text: &str) -> BotResponse {
        let intent = Intent::ScriptureSpecific;
        let Some(reference) = self.scripture_parser.extract_reference(cleaned_text) else {
            return BotResponse::new(
                intent,
                Mood::Thinking,
                "¿Qué pasaje quieres leer? Escríbelo como **Juan 3:16** o **Salmos 23**.",
            );
        };

        match self.scripture.get_specific_verse(&reference).await {
            Ok(verse) => BotResponse::new(intent, Mood::Happy, format_verse(&verse)),
            Err(e) => {
                tracing::error!(error = %e, reference = %reference, "verse lookup failed");
                BotResponse::new(
                    intent,
                    Mood::Worried,
                    format!(
                        "No pude obtener {}: {e}. Revisa que la referencia exista, por ejemplo **Juan 3:16**.",
                        bold(&reference)
                    ),
                )
            }
        }
    }

    pub(crate) async fn handle_topic_verse(&self, cleaned_text: &str) -> BotResponse {
        let intent = Intent::ScriptureTopic;
        let Some(topic) = self.scripture_parser.extract_topic(cleaned_text) else {
            return BotResponse::new(
                intent,
                Mood::Thinking,
                "¿Sobre qué tema quieres un versículo? Por ejemplo: **versículos sobre la paz**.",
            );
        };

        match self.scripture.search_verses_by_topic(&topic).await {
            Ok(verse) => BotResponse::new(
                intent,
                Mood::Happy,
                format!("🕊️ Un versículo sobre {}\n\n{}", bold(&topic), format_verse(&verse)),
            ),
            Err(e) => {
                tracing::error!(error = %e, topic = %topic, "topic verse lookup failed");
                BotResponse::new(
                    intent,
                    Mood::Worried,
                    format!("No encontré versículos sobre «{topic}»: {e}."),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ScriptureParser {
        ScriptureParser::from_vocabulary(&Vocabulary::load(None).unwrap()).unwrap()
    }

    #[test]
    fn test_extract_reference() {
        let p = parser();
        assert_eq!(p.extract_reference("juan 3:16"), Some("Juan 3:16".to_string()));
        assert_eq!(p.extract_reference("lee juan 3 : 16"), Some("Juan 3:16".to_string()));
        assert_eq!(
            p.extract_reference("1 corintios 13:4-7 por fa"),
            Some("1 Corintios 13:4-7".to_string())
        );
        assert_eq!(p.extract_reference("salmo 23"), Some("Salmo 23".to_string()));
        assert_eq!(
            p.extract_reference("léeme el capítulo 3 de juan"),
            Some("Juan 3".to_string())
        );
        assert_eq!(p.extract_reference("versículo"), None);
    }

    #[test]
    fn test_reference_skips_clock_times() {
        let p = parser();
        assert_eq!(p.extract_reference("a las 10:30"), None);
        assert_eq!(
            p.extract_reference("a las 10:30 lee romanos 8:28"),
            Some("Romanos 8:28".to_string())
        );
        assert_eq!(p.extract_reference("génesis 1:1"), Some("Genesis 1:1".to_string()));
    }

    #[test]
    fn test_extract_topic() {
        let p = parser();
        assert_eq!(p.extract_topic("versículos sobre la paz"), Some("paz".to_string()));
        assert_eq!(
            p.extract_topic("qué dice la biblia acerca del perdón?"),
            Some("perdón".to_string())
        );
        assert_eq!(p.extract_topic("textos de esperanza"), Some("esperanza".to_string()));
        assert_eq!(p.extract_topic("versículos"), None);
    }

    #[test]
    fn test_fallback_verse() {
        let verse = fallback_verse();
        assert_eq!(verse.reference, "Juan 3:16");
        assert!(format_verse(&verse).contains("Reina-Valera 1960"));
    }
}
