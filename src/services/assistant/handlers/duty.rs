use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::{BotResponse, DirectoryEntry, Intent, Mood, ServiceEntry};
use crate::services::assistant::replies::{self, bold};
use crate::services::assistant::resolver::Resolution;
use crate::services::assistant::text::{contains_words, fold, format_date};
use crate::services::assistant::ChatEngine;

/// Further duties listed after the nearest one.
const MAX_FOLLOWING: usize = 5;

/// Which text field of a service mentioned the person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Participation {
    Leads,
    SpecialActivity,
    Notes,
}

struct Duty {
    service: ServiceEntry,
    participation: Participation,
}

/// Services on or after `today` that mention `full_name` as leader, in the
/// special activity or in the notes. Sorted by date, one per date and slot.
fn upcoming_duties(services: Vec<ServiceEntry>, full_name: &str, today: NaiveDate) -> Vec<Duty> {
    let name = fold(full_name);
    let mentions = |field: &Option<String>| {
        field
            .as_deref()
            .map(|text| contains_words(&fold(text), &name))
            .unwrap_or(false)
    };

    let mut duties: Vec<Duty> = services
        .into_iter()
        .filter(|s| s.date >= today)
        .filter_map(|service| {
            let participation = if mentions(&service.leader) {
                Participation::Leads
            } else if mentions(&service.special_activity) {
                Participation::SpecialActivity
            } else if mentions(&service.notes) {
                Participation::Notes
            } else {
                return None;
            };
            Some(Duty {
                service,
                participation,
            })
        })
        .collect();

    duties.sort_by(|a, b| {
        a.service
            .date
            .cmp(&b.service.date)
            .then_with(|| a.service.time.cmp(&b.service.time))
    });

    let mut seen = HashSet::new();
    duties.retain(|d| {
        let slot = d.service.time.as_deref().unwrap_or(&d.service.title);
        seen.insert((d.service.date, fold(slot)))
    });
    duties
}

fn describe(duty: &Duty) -> String {
    match duty.participation {
        Participation::Leads => "dirección".to_string(),
        Participation::SpecialActivity => duty
            .service
            .special_activity
            .clone()
            .unwrap_or_else(|| "participación especial".to_string()),
        Participation::Notes => "participación".to_string(),
    }
}

fn format_report(subject: &str, is_self: bool, duties: &[Duty]) -> String {
    let Some((next, rest)) = duties.split_first() else {
        return String::new();
    };

    let heading = if is_self {
        "🎤 Tu próximo turno".to_string()
    } else {
        format!("🎤 El próximo turno de {}", bold(subject))
    };
    let mut lines = vec![format!(
        "{heading} es el {}{}",
        bold(&format_date(next.service.date)),
        next.service
            .time
            .as_deref()
            .map(|t| format!(" a las {t}"))
            .unwrap_or_default()
    )];
    lines.push(format!("⛪ {} ({})", next.service.title, describe(next)));
    if let Some(location) = &next.service.location {
        lines.push(format!("📍 {location}"));
    }

    if !rest.is_empty() {
        lines.push(String::new());
        lines.push("Después:".to_string());
        lines.extend(rest.iter().take(MAX_FOLLOWING).map(|d| {
            format!(
                "• {}: {} ({})",
                format_date(d.service.date),
                d.service.title,
                describe(d)
            )
        }));
    }
    lines.join("\n")
}

impl ChatEngine {
    pub(crate) async fn handle_self_duty(&self, user_id: &str, today: NaiveDate) -> BotResponse {
        match self.directory.find_by_id(user_id).await {
            Some(me) => self.duty_report(Intent::SelfDutyLookup, &me, true, today).await,
            None => BotResponse::new(
                Intent::SelfDutyLookup,
                Mood::Thinking,
                "No encontré tu perfil en el directorio de miembros. Pide a un administrador que vincule tu cuenta para consultar tus turnos.",
            ),
        }
    }

    pub(crate) async fn handle_other_duty(&self, cleaned_text: &str, today: NaiveDate) -> BotResponse {
        let intent = Intent::OtherDutyLookup;
        let Some(fragment) = self.resolver.extract_name(cleaned_text) else {
            return BotResponse::new(
                intent,
                Mood::Thinking,
                "¿De quién quieres saber? Por ejemplo: **¿cuándo le toca a Pedro Santana?**",
            );
        };

        let entries = self.directory.get().await;
        match self.resolver.resolve(&fragment, &entries) {
            Resolution::NotFound => replies::person_not_found(intent, &fragment),
            Resolution::Ambiguous(matches) => replies::ambiguous_people(intent, &fragment, &matches),
            Resolution::Resolved(found) => self.duty_report(intent, &found.entry, false, today).await,
        }
    }

    async fn duty_report(
        &self,
        intent: Intent,
        person: &DirectoryEntry,
        is_self: bool,
        today: NaiveDate,
    ) -> BotResponse {
        let full_name = person.full_name();
        let services = match self
            .schedule
            .find_upcoming_services_matching(&full_name, today)
            .await
        {
            Ok(services) => services,
            Err(e) => return replies::collaborator_failure(intent, "service schedule", &e),
        };

        let duties = upcoming_duties(services, &full_name, today);
        if duties.is_empty() {
            let message = if is_self {
                "No tienes turnos próximos programados. ¡Disfruta el descanso! 🙌".to_string()
            } else {
                format!("{} no tiene turnos próximos programados.", bold(&full_name))
            };
            return BotResponse::new(intent, Mood::Neutral, message);
        }

        BotResponse::new(intent, Mood::Happy, format_report(&full_name, is_self, &duties))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn service(id: &str, date: NaiveDate, leader: Option<&str>, notes: Option<&str>) -> ServiceEntry {
        ServiceEntry {
            id: id.to_string(),
            date,
            time: Some("10:00".to_string()),
            title: "Culto dominical".to_string(),
            leader: leader.map(str::to_string),
            location: Some("Templo Central".to_string()),
            notes: notes.map(str::to_string),
            special_activity: None,
        }
    }

    #[test]
    fn test_filters_by_name_and_date() {
        let services = vec![
            service("past", date(10, 11), Some("Ana Pérez"), None),
            service("later", date(11, 1), None, Some("Coros: ana perez, Luis")),
            service("next", date(10, 25), Some("Ana Pérez"), None),
            service("other", date(10, 25), Some("Pedro Santana"), None),
            service("substring", date(11, 8), Some("Mariana Pérez"), None),
        ];
        let duties = upcoming_duties(services, "Ana Pérez", date(10, 19));
        let ids: Vec<&str> = duties.iter().map(|d| d.service.id.as_str()).collect();
        assert_eq!(ids, vec!["next", "later"]);
        assert_eq!(duties[0].participation, Participation::Leads);
        assert_eq!(duties[1].participation, Participation::Notes);
    }

    #[test]
    fn test_deduplicates_same_slot() {
        let services = vec![
            service("a", date(10, 25), Some("Ana Pérez"), None),
            service("b", date(10, 25), None, Some("Ana Pérez")),
        ];
        let duties = upcoming_duties(services, "Ana Pérez", date(10, 19));
        assert_eq!(duties.len(), 1);
    }

    #[test]
    fn test_report_lists_following_duties() {
        let services = (0..8)
            .map(|i| {
                let day = date(11, 1) + chrono::Duration::weeks(i);
                service(&i.to_string(), day, Some("Ana Pérez"), None)
            })
            .collect();
        let duties = upcoming_duties(services, "Ana Pérez", date(10, 19));
        let text = format_report("Ana Pérez", true, &duties);
        assert!(text.starts_with("🎤 Tu próximo turno es el **domingo 1 de noviembre** a las 10:00"));
        assert!(text.contains("📍 Templo Central"));
        assert_eq!(text.matches("• ").count(), MAX_FOLLOWING);
    }
}
