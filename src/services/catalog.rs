use async_trait::async_trait;

use crate::models::{ServiceSlot, SongEntry};

#[async_trait]
pub trait SongCatalog: Send + Sync {
    /// Case-insensitive substring search over title and artist.
    async fn search_songs(&self, query: &str) -> anyhow::Result<Vec<SongEntry>>;

    async fn find_next_service_led_by(&self, full_name: &str) -> anyhow::Result<Option<ServiceSlot>>;
}
