use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::{BotResponse, Intent, Mood};
use crate::services::assistant::replies::bold;
use crate::services::assistant::text::format_date;
use crate::services::assistant::ChatEngine;

pub const REHEARSAL_DAY: Weekday = Weekday::Fri;
pub const REHEARSAL_HOURS: &str = "7:00 p.m. a 9:00 p.m.";

/// Next rehearsal strictly after `today`. On a rehearsal day this is a
/// week ahead.
pub fn next_rehearsal(today: NaiveDate) -> NaiveDate {
    let ahead = (7 + REHEARSAL_DAY.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    today + Duration::days(i64::from(ahead))
}

impl ChatEngine {
    pub(crate) fn handle_rehearsal(&self, today: NaiveDate) -> BotResponse {
        let date = next_rehearsal(today);
        let when = if date == today + Duration::days(1) {
            " (¡es mañana!)"
        } else {
            ""
        };
        BotResponse::new(
            Intent::RehearsalSchedule,
            Mood::Happy,
            format!(
                "🎶 El próximo ensayo es el {}{when}, de {}.",
                bold(&format_date(date)),
                bold(REHEARSAL_HOURS)
            ),
        )
    }
}
