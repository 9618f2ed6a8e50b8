pub mod cache;

use async_trait::async_trait;

use crate::models::DirectoryEntry;

pub use cache::DirectoryCache;

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn list_active_members(&self) -> anyhow::Result<Vec<DirectoryEntry>>;
}
