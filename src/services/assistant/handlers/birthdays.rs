use chrono::{Datelike, NaiveDate};

use crate::models::{BotResponse, DirectoryEntry, Intent, Mood};
use crate::services::assistant::replies::bold;
use crate::services::assistant::text::{contains_words, fold, month_in_text, month_name};
use crate::services::assistant::ChatEngine;

const BIRTH_DATE_FORMATS: [&str; 3] = ["%d/%m/%y", "%d/%m/%Y", "%Y-%m-%d"];

/// Day and month of a stored birth date. Accepts "dd/mm/yy", "dd/mm/yyyy"
/// and ISO "yyyy-mm-dd" with an optional time suffix, which is dropped
/// rather than converted so no timezone can shift the day.
pub fn parse_birth_date(raw: &str) -> Option<(u32, u32)> {
    let date = raw.trim().split(['T', ' ']).next()?;
    BIRTH_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
        .map(|d| (d.day(), d.month()))
}

/// Month a birthday question is about: a named month, a relative one
/// ("el próximo mes") or the current month.
pub fn target_month(cleaned_text: &str, today: NaiveDate) -> u32 {
    let folded = fold(cleaned_text);
    if let Some(month) = month_in_text(&folded) {
        return month;
    }
    let relative = ["proximo mes", "siguiente mes", "mes que viene", "mes proximo", "mes entrante"]
        .iter()
        .any(|phrase| contains_words(&folded, phrase));
    if relative {
        today.month() % 12 + 1
    } else {
        today.month()
    }
}

/// (day, entry) pairs born in `month`, ordered by day then name.
fn birthdays_in(entries: &[DirectoryEntry], month: u32) -> Vec<(u32, &DirectoryEntry)> {
    let mut found: Vec<(u32, &DirectoryEntry)> = entries
        .iter()
        .filter_map(|entry| {
            let (day, m) = parse_birth_date(entry.birth_date.as_deref()?)?;
            (m == month).then_some((day, entry))
        })
        .collect();
    found.sort_by(|(da, a), (db, b)| da.cmp(db).then_with(|| a.full_name().cmp(&b.full_name())));
    found
}

impl ChatEngine {
    pub(crate) async fn handle_birthdays(&self, cleaned_text: &str, today: NaiveDate) -> BotResponse {
        let intent = Intent::BirthdayByMonth;
        let month = target_month(cleaned_text, today);
        let entries = self.directory.get().await;
        let found = birthdays_in(&entries, month);
        let month_label = month_name(month);

        if found.is_empty() {
            return BotResponse::new(
                intent,
                Mood::Neutral,
                format!("No hay cumpleaños registrados en {}.", bold(month_label)),
            );
        }

        let lines = found
            .iter()
            .map(|(day, entry)| {
                let detail = entry
                    .voice_or_instrument
                    .as_deref()
                    .map(|v| format!(" ({v})"))
                    .unwrap_or_default();
                let is_today = month == today.month() && *day == today.day();
                format!(
                    "• {}: {}{detail}{}",
                    bold(&day.to_string()),
                    entry.full_name(),
                    if is_today { " 🎉 ¡hoy!" } else { "" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        BotResponse::new(
            intent,
            Mood::Happy,
            format!("🎂 Cumpleaños de {}:\n{lines}", bold(month_label)),
        )
    }
}
