use std::collections::HashSet;

use regex::Regex;

use crate::models::{BotResponse, Intent, Mood, ServiceSlot, SongEntry};
use crate::services::assistant::actions::{ActionBuilder, MAX_ACTIONS};
use crate::services::assistant::replies::{self, bold};
use crate::services::assistant::text::{fold, format_date, trim_punctuation};
use crate::services::assistant::ChatEngine;

/// Shortest title fragment accepted for a selection.
pub const MIN_SELECT_FRAGMENT: usize = 3;

/// Pulls search queries and selection fragments out of cleaned text.
pub struct SongQueryParser {
    filler: HashSet<String>,
    select_patterns: Vec<Regex>,
}

impl SongQueryParser {
    pub fn from_vocabulary(vocabulary: &crate::models::Vocabulary) -> anyhow::Result<Self> {
        let select_patterns = vocabulary
            .song_select_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            filler: vocabulary.filler_words.iter().map(|w| fold(w)).collect(),
            select_patterns,
        })
    }

    /// "buscar la canción sublime gracia" -> "sublime gracia". Only leading
    /// filler is dropped so titles such as "Cuán grande es Él" survive.
    pub fn search_query(&self, cleaned_text: &str) -> String {
        let tokens: Vec<&str> = cleaned_text.split_whitespace().collect();
        let start = tokens
            .iter()
            .take_while(|t| {
                let bare = fold(trim_punctuation(t));
                bare.is_empty() || self.filler.contains(&bare)
            })
            .count();
        trim_punctuation(&tokens[start..].join(" ")).to_string()
    }

    /// Title fragment of a selection request; `None` when too short to be
    /// meaningful.
    pub fn select_fragment(&self, cleaned_text: &str) -> Option<String> {
        let fragment = self.select_patterns.iter().find_map(|pattern| {
            let caps = pattern.captures(cleaned_text)?;
            let name = trim_punctuation(caps.name("name")?.as_str());
            (!name.is_empty()).then(|| name.to_string())
        })?;
        (fragment.chars().count() >= MIN_SELECT_FRAGMENT).then_some(fragment)
    }
}

fn song_line(index: usize, song: &SongEntry) -> String {
    let mut line = format!("{}. {}", index + 1, bold(&song.title));
    if let Some(artist) = &song.artist {
        line.push_str(&format!(" de {artist}"));
    }
    if let Some(key) = &song.key {
        line.push_str(&format!(" (tono {key})"));
    }
    line
}

fn song_list(songs: &[SongEntry]) -> String {
    songs
        .iter()
        .enumerate()
        .map(|(i, s)| song_line(i, s))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ChatEngine {
    pub(crate) async fn handle_song_search(&self, cleaned_text: &str, user_id: &str) -> BotResponse {
        let intent = Intent::SongSearch;
        let query = self.songs.search_query(cleaned_text);
        if query.is_empty() {
            return BotResponse::new(
                intent,
                Mood::Thinking,
                "¿Qué canción quieres buscar? Por ejemplo: **buscar sublime gracia**",
            );
        }

        let mut songs = match self.catalog.search_songs(&query).await {
            Ok(songs) => songs,
            Err(e) => return replies::collaborator_failure(intent, "song catalog", &e),
        };
        if songs.is_empty() {
            return BotResponse::new(
                intent,
                Mood::Thinking,
                format!("No encontré canciones que coincidan con «{query}». Prueba con otra palabra del título o el nombre del artista."),
            );
        }
        songs.truncate(MAX_ACTIONS);

        let heading = if songs.len() == 1 {
            format!("🎵 Encontré 1 canción para «{query}»:")
        } else {
            format!("🎵 Encontré {} canciones para «{query}»:", songs.len())
        };
        let mut message = format!("{heading}\n{}", song_list(&songs));

        match self.service_led_by(user_id).await {
            Some(slot) => {
                message.push_str(&format!(
                    "\n\n¿Quieres agregar alguna a tu servicio del {}?",
                    bold(&format_date(slot.service_date))
                ));
                let actions = ActionBuilder::new(Some(&slot)).select_songs(&songs);
                BotResponse::new(intent, Mood::Happy, message).with_actions(actions)
            }
            None => BotResponse::new(intent, Mood::Happy, message),
        }
    }

    pub(crate) async fn handle_song_select(&self, cleaned_text: &str, user_id: &str) -> BotResponse {
        let intent = Intent::SongSelect;
        let Some(fragment) = self.songs.select_fragment(cleaned_text) else {
            return BotResponse::new(
                intent,
                Mood::Thinking,
                "Dime el nombre de la canción que quieres seleccionar, por ejemplo: **selecciona Sublime Gracia**",
            );
        };

        let mut songs = match self.catalog.search_songs(&fragment).await {
            Ok(songs) => songs,
            Err(e) => return replies::collaborator_failure(intent, "song catalog", &e),
        };
        let slot = self.service_led_by(user_id).await;
        let builder = ActionBuilder::new(slot.as_ref());
        let target = slot
            .as_ref()
            .map(|s| format!(" a tu servicio del {}", bold(&format_date(s.service_date))))
            .unwrap_or_default();

        match songs.len() {
            0 => BotResponse::new(
                intent,
                Mood::Thinking,
                format!("No encontré «{fragment}» en el repertorio. Usa **buscar** seguido de una palabra del título para ver opciones."),
            ),
            1 => {
                let song = &songs[0];
                BotResponse::new(
                    intent,
                    Mood::Happy,
                    format!("🎵 ¿Quieres agregar {}{target}?", bold(&song.title)),
                )
                .with_actions(vec![builder.select_song(song)])
            }
            _ => {
                songs.truncate(MAX_ACTIONS);
                BotResponse::new(
                    intent,
                    Mood::Thinking,
                    format!(
                        "Encontré varias canciones para «{fragment}»:\n{}\n\n¿Cuál quieres agregar{target}?",
                        song_list(&songs)
                    ),
                )
                .with_actions(builder.select_songs(&songs))
            }
        }
    }

    /// Next service the requesting member leads. Lookup failures only cost
    /// the follow-up buttons, so they are logged and swallowed.
    async fn service_led_by(&self, user_id: &str) -> Option<ServiceSlot> {
        let me = self.directory.find_by_id(user_id).await?;
        match self.catalog.find_next_service_led_by(&me.full_name()).await {
            Ok(slot) => slot,
            Err(e) => {
                tracing::warn!(error = %e, user_id, "failed to look up led service");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vocabulary;

    fn parser() -> SongQueryParser {
        SongQueryParser::from_vocabulary(&Vocabulary::load(None).unwrap()).unwrap()
    }

    #[test]
    fn test_search_query_strips_leading_filler() {
        let p = parser();
        assert_eq!(p.search_query("buscar gracia"), "gracia");
        assert_eq!(p.search_query("busca la canción sublime gracia?"), "sublime gracia");
        assert_eq!(p.search_query("tienes la alabanza cuán grande es él"), "cuán grande es él");
        assert_eq!(p.search_query("buscar canciones"), "");
    }

    #[test]
    fn test_select_fragment() {
        let p = parser();
        assert_eq!(p.select_fragment("selecciona sublime gracia"), Some("sublime gracia".to_string()));
        assert_eq!(
            p.select_fragment("agrega la canción way maker al servicio del domingo"),
            Some("way maker".to_string())
        );
        assert_eq!(
            p.select_fragment("quiero usar \"Cuán Grande\" el domingo"),
            Some("Cuán Grande".to_string())
        );
        assert_eq!(p.select_fragment("añade la canción océanos"), Some("océanos".to_string()));
    }

    #[test]
    fn test_select_fragment_rejects_too_short() {
        let p = parser();
        assert_eq!(p.select_fragment("selecciona la"), None);
        assert_eq!(p.select_fragment("elige yo"), None);
    }

    #[test]
    fn test_song_line_includes_artist_and_key() {
        let song = SongEntry {
            id: "1".to_string(),
            title: "Sublime Gracia".to_string(),
            artist: Some("John Newton".to_string()),
            key: Some("G".to_string()),
        };
        assert_eq!(song_line(0, &song), "1. **Sublime Gracia** de John Newton (tono G)");
    }
}
