use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Mutex;

use super::MemberDirectory;
use crate::models::{CacheSnapshot, DirectoryEntry};
use crate::services::clock::Clock;

pub const DEFAULT_TTL_SECS: i64 = 300;

/// Time-bounded copy of the active-member roster.
///
/// The snapshot is replaced whole on refresh and never served once it is
/// older than `ttl`. The lock is held across the fetch, so concurrent readers
/// that find the snapshot stale wait on a single refresh.
pub struct DirectoryCache {
    directory: Arc<dyn MemberDirectory>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    snapshot: Mutex<Option<Arc<CacheSnapshot>>>,
}

impl DirectoryCache {
    pub fn new(directory: Arc<dyn MemberDirectory>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            directory,
            clock,
            ttl,
            snapshot: Mutex::new(None),
        }
    }

    /// Current roster. Refetches when the snapshot is missing or expired; a
    /// failed fetch yields an empty list rather than an error.
    pub async fn get(&self) -> Vec<DirectoryEntry> {
        let mut guard = self.snapshot.lock().await;
        let now = self.clock.now();

        if let Some(snapshot) = guard.as_ref() {
            if now - snapshot.fetched_at <= self.ttl {
                return snapshot.entries.clone();
            }
        }

        match self.directory.list_active_members().await {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "directory snapshot refreshed");
                let snapshot = Arc::new(CacheSnapshot {
                    entries,
                    fetched_at: now,
                });
                let entries = snapshot.entries.clone();
                *guard = Some(snapshot);
                entries
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to refresh member directory");
                // An expired snapshot must not be served again.
                *guard = None;
                Vec::new()
            }
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Option<DirectoryEntry> {
        self.get().await.into_iter().find(|e| e.id == id)
    }

    pub async fn invalidate(&self) {
        *self.snapshot.lock().await = None;
        tracing::info!("directory cache invalidated");
    }
}
