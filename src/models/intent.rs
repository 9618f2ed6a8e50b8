use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    SelfDutyLookup,
    OtherDutyLookup,
    RehearsalSchedule,
    SongSearch,
    SongSelect,
    BirthdayByMonth,
    ScriptureDaily,
    ScriptureSpecific,
    ScriptureTopic,
    Help,
    Unclassified,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::SelfDutyLookup => "self_duty_lookup",
            Intent::OtherDutyLookup => "other_duty_lookup",
            Intent::RehearsalSchedule => "rehearsal_schedule",
            Intent::SongSearch => "song_search",
            Intent::SongSelect => "song_select",
            Intent::BirthdayByMonth => "birthday_by_month",
            Intent::ScriptureDaily => "scripture_daily",
            Intent::ScriptureSpecific => "scripture_specific",
            Intent::ScriptureTopic => "scripture_topic",
            Intent::Help => "help",
            Intent::Unclassified => "unclassified",
        }
    }
}

/// Cleaned text plus the intent it was classified as. Built once per message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedMessage {
    pub cleaned_text: String,
    pub intent: Intent,
}
