use std::fmt::Display;

use crate::models::{BotResponse, Intent, Mood, NameMatch};

/// Converts a collaborator failure into the user-facing apology and logs it.
pub fn collaborator_failure(intent: Intent, collaborator: &str, error: &dyn Display) -> BotResponse {
    tracing::error!(
        intent = intent.as_str(),
        collaborator,
        error = %error,
        "collaborator call failed"
    );
    BotResponse::new(
        intent,
        Mood::Worried,
        "Lo siento, tuve un problema consultando la información. Intenta de nuevo en unos minutos.",
    )
}

pub fn person_not_found(intent: Intent, fragment: &str) -> BotResponse {
    BotResponse::new(
        intent,
        Mood::Thinking,
        format!(
            "No encontré a «{fragment}» en el directorio. Revisa la ortografía o consulta la lista de miembros."
        ),
    )
}

pub fn ambiguous_people(intent: Intent, fragment: &str, matches: &[NameMatch]) -> BotResponse {
    let options = matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let detail = m
                .entry
                .voice_or_instrument
                .as_deref()
                .or(m.entry.role.as_deref())
                .map(|d| format!(" ({d})"))
                .unwrap_or_default();
            format!("{}. {}{detail}", i + 1, m.entry.full_name())
        })
        .collect::<Vec<_>>()
        .join("\n");

    BotResponse::new(
        intent,
        Mood::Thinking,
        format!(
            "Encontré varias personas que coinciden con «{fragment}»:\n{options}\n\n¿A quién te refieres? Escríbeme el nombre completo."
        ),
    )
}

pub fn bold(s: &str) -> String {
    format!("**{s}**")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DirectoryEntry;

    fn name_match(first: &str, last: &str, voice: Option<&str>) -> NameMatch {
        NameMatch {
            entry: DirectoryEntry {
                id: first.to_lowercase(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                role: Some("Músico".to_string()),
                voice_or_instrument: voice.map(str::to_string),
                birth_date: None,
            },
            confidence: 100,
        }
    }

    #[test]
    fn test_ambiguous_lists_numbered_options() {
        let resp = ambiguous_people(
            Intent::OtherDutyLookup,
            "santana",
            &[
                name_match("María", "Santana", Some("Soprano")),
                name_match("Pedro", "Santana", None),
            ],
        );
        assert!(resp.message.contains("1. María Santana (Soprano)"));
        assert!(resp.message.contains("2. Pedro Santana (Músico)"));
        assert_eq!(resp.mood, Mood::Thinking);
        assert!(resp.actions.is_empty());
    }

    #[test]
    fn test_failure_is_worried() {
        let resp = collaborator_failure(Intent::SongSearch, "song catalog", &"timeout");
        assert_eq!(resp.mood, Mood::Worried);
        assert_eq!(resp.intent, Intent::SongSearch);
    }
}
