use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One scheduled service as exposed by the schedule collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceEntry {
    pub id: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub title: String,
    pub leader: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub special_activity: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SongEntry {
    pub id: String,
    pub title: String,
    pub artist: Option<String>,
    pub key: Option<String>,
}

/// The next service a member is leading, target of `select_song` actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceSlot {
    pub service_id: String,
    pub service_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verse {
    pub reference: String,
    pub text: String,
    pub translation_name: String,
}
