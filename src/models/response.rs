use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Intent;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Neutral,
    Thinking,
    Happy,
    Worried,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Neutral => "neutral",
            Mood::Thinking => "thinking",
            Mood::Happy => "happy",
            Mood::Worried => "worried",
        }
    }
}

/// Follow-up operation offered alongside a response. The chat pipeline
/// executes it only when the user invokes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BotAction {
    SelectSong {
        song_id: String,
        song_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        service_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        service_date: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BotResponse {
    pub intent: Intent,
    pub message: String,
    pub mood: Mood,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<BotAction>,
}

impl BotResponse {
    pub fn new(intent: Intent, mood: Mood, message: impl Into<String>) -> Self {
        Self {
            intent,
            message: message.into(),
            mood,
            actions: Vec::new(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<BotAction>) -> Self {
        self.actions = actions;
        self
    }
}
