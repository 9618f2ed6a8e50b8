use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
    pub voice_or_instrument: Option<String>,
    /// Stored as either `dd/mm/yy` or `yyyy-mm-dd`.
    pub birth_date: Option<String>,
}

impl DirectoryEntry {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    pub entries: Vec<DirectoryEntry>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub entry: DirectoryEntry,
    pub confidence: u32,
}
