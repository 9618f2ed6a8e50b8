use crate::models::{BotAction, ServiceSlot, SongEntry};

/// Most follow-up buttons a single response may carry.
pub const MAX_ACTIONS: usize = 5;

/// Builds `select_song` directives, optionally aimed at a service the
/// requesting member leads.
pub struct ActionBuilder<'a> {
    target: Option<&'a ServiceSlot>,
}

impl<'a> ActionBuilder<'a> {
    pub fn new(target: Option<&'a ServiceSlot>) -> Self {
        Self { target }
    }

    pub fn select_song(&self, song: &SongEntry) -> BotAction {
        BotAction::SelectSong {
            song_id: song.id.clone(),
            song_name: song.title.clone(),
            service_id: self.target.map(|s| s.service_id.clone()),
            service_date: self.target.map(|s| s.service_date),
        }
    }

    pub fn select_songs(&self, songs: &[SongEntry]) -> Vec<BotAction> {
        songs
            .iter()
            .take(MAX_ACTIONS)
            .map(|song| self.select_song(song))
            .collect()
    }
}
