pub mod bible_api;

use async_trait::async_trait;

use crate::models::Verse;

#[async_trait]
pub trait ScriptureProvider: Send + Sync {
    async fn get_random_verse(&self) -> anyhow::Result<Verse>;
    async fn get_specific_verse(&self, reference: &str) -> anyhow::Result<Verse>;
    async fn search_verses_by_topic(&self, topic: &str) -> anyhow::Result<Verse>;
}
