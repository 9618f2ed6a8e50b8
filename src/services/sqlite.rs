use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{BotResponse, DirectoryEntry, ServiceEntry, ServiceSlot, SongEntry};
use crate::services::assistant::text::{contains_words, fold};
use crate::services::catalog::SongCatalog;
use crate::services::clock::Clock;
use crate::services::directory::MemberDirectory;
use crate::services::messaging::MessageStore;
use crate::services::schedule::ServiceSchedule;

/// Local database backing every collaborator the engine needs.
pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl SqliteStore {
    pub fn new(db: Arc<Mutex<Connection>>, clock: Arc<dyn Clock>, timezone: Tz) -> Self {
        Self { db, clock, timezone }
    }

    fn conn(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.timezone).date_naive()
    }
}

fn mentions(field: &Option<String>, folded_name: &str) -> bool {
    field
        .as_deref()
        .map(|text| fold(text).contains(folded_name))
        .unwrap_or(false)
}

#[async_trait]
impl MemberDirectory for SqliteStore {
    async fn list_active_members(&self) -> anyhow::Result<Vec<DirectoryEntry>> {
        let conn = self.conn()?;
        queries::list_active_members(&conn)
    }
}

#[async_trait]
impl ServiceSchedule for SqliteStore {
    async fn find_upcoming_services_matching(
        &self,
        name_or_role: &str,
        from: NaiveDate,
    ) -> anyhow::Result<Vec<ServiceEntry>> {
        let needle = fold(name_or_role.trim());
        if needle.is_empty() {
            return Ok(vec![]);
        }

        let services = {
            let conn = self.conn()?;
            queries::get_services_from(&conn, from)?
        };
        Ok(services
            .into_iter()
            .filter(|s| {
                mentions(&s.leader, &needle)
                    || mentions(&s.notes, &needle)
                    || mentions(&s.special_activity, &needle)
            })
            .collect())
    }
}

#[async_trait]
impl SongCatalog for SqliteStore {
    async fn search_songs(&self, query: &str) -> anyhow::Result<Vec<SongEntry>> {
        let needle = fold(query.trim());
        if needle.is_empty() {
            return Ok(vec![]);
        }

        let songs = {
            let conn = self.conn()?;
            queries::list_songs(&conn)?
        };
        Ok(songs
            .into_iter()
            .filter(|song| {
                fold(&song.title).contains(&needle)
                    || song
                        .artist
                        .as_deref()
                        .map(|a| fold(a).contains(&needle))
                        .unwrap_or(false)
            })
            .collect())
    }

    async fn find_next_service_led_by(&self, full_name: &str) -> anyhow::Result<Option<ServiceSlot>> {
        let name = fold(full_name.trim());
        if name.is_empty() {
            return Ok(None);
        }

        let services = {
            let conn = self.conn()?;
            queries::get_services_from(&conn, self.today())?
        };
        Ok(services
            .into_iter()
            .find(|s| {
                s.leader
                    .as_deref()
                    .map(|leader| contains_words(&fold(leader), &name))
                    .unwrap_or(false)
            })
            .map(|s| ServiceSlot {
                service_id: s.id,
                service_date: s.date,
            }))
    }
}

#[async_trait]
impl MessageStore for SqliteStore {
    async fn insert_assistant_message(&self, room_id: &str, response: &BotResponse) -> anyhow::Result<()> {
        let conn = self.conn()?;
        let id = queries::insert_assistant_message(&conn, room_id, response)?;
        tracing::debug!(message_id = %id, room_id, "stored assistant message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_db;
    use crate::services::clock::ManualClock;
    use chrono::{TimeZone, Utc};

    fn store() -> SqliteStore {
        let conn = init_memory_db().unwrap();
        for (id, title, artist) in [
            ("1", "Sublime Gracia", Some("John Newton")),
            ("2", "Gracia Sublime Es", None),
            ("3", "Cuán Grande Es Él", None),
        ] {
            queries::insert_song(
                &conn,
                &SongEntry {
                    id: id.to_string(),
                    title: title.to_string(),
                    artist: artist.map(str::to_string),
                    key: None,
                },
            )
            .unwrap();
        }
        for (id, day, leader) in [("past", 11, "Ana Pérez"), ("next", 25, "Ana Pérez"), ("x", 26, "Luis Mora")] {
            queries::insert_service(
                &conn,
                &ServiceEntry {
                    id: id.to_string(),
                    date: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
                    time: Some("10:00".to_string()),
                    title: "Culto".to_string(),
                    leader: Some(leader.to_string()),
                    location: None,
                    notes: None,
                    special_activity: None,
                },
            )
            .unwrap();
        }

        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 19, 15, 0, 0).unwrap());
        SqliteStore::new(Arc::new(Mutex::new(conn)), Arc::new(clock), chrono_tz::Tz::UTC)
    }

    #[tokio::test]
    async fn test_song_search_ignores_accents_and_case() {
        let store = store();
        let found = store.search_songs("GRACIA").await.unwrap();
        assert_eq!(found.len(), 2);
        let found = store.search_songs("cuan grande").await.unwrap();
        assert_eq!(found[0].id, "3");
        let found = store.search_songs("newton").await.unwrap();
        assert_eq!(found[0].id, "1");
    }

    #[tokio::test]
    async fn test_next_led_service_skips_past() {
        let store = store();
        let slot = store.find_next_service_led_by("Ana Pérez").await.unwrap().unwrap();
        assert_eq!(slot.service_id, "next");
        assert!(store.find_next_service_led_by("Pedro").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upcoming_services_matching() {
        let store = store();
        let from = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let found = store.find_upcoming_services_matching("ana perez", from).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "next");
    }
}
