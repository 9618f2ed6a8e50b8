use async_trait::async_trait;

use crate::models::BotResponse;

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persists `response` in `room_id`, authored by the assistant.
    async fn insert_assistant_message(&self, room_id: &str, response: &BotResponse) -> anyhow::Result<()>;
}
