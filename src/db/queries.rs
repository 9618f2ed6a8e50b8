use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection};

use crate::models::{BotResponse, DirectoryEntry, ServiceEntry, SongEntry};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const ASSISTANT_SENDER: &str = "assistant";

// ── Members ──

pub fn list_active_members(conn: &Connection) -> anyhow::Result<Vec<DirectoryEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, role, voice_or_instrument, birth_date
         FROM members WHERE active = 1 ORDER BY first_name, last_name",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(DirectoryEntry {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            role: row.get(3)?,
            voice_or_instrument: row.get(4)?,
            birth_date: row.get(5)?,
        })
    })?;

    let mut members = vec![];
    for row in rows {
        members.push(row?);
    }
    Ok(members)
}

pub fn upsert_member(conn: &Connection, member: &DirectoryEntry, active: bool) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO members (id, first_name, last_name, role, voice_or_instrument, birth_date, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            role = excluded.role,
            voice_or_instrument = excluded.voice_or_instrument,
            birth_date = excluded.birth_date,
            active = excluded.active",
        params![
            member.id,
            member.first_name,
            member.last_name,
            member.role,
            member.voice_or_instrument,
            member.birth_date,
            active as i32,
        ],
    )?;
    Ok(())
}

// ── Services ──

pub fn insert_service(conn: &Connection, service: &ServiceEntry) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO services (id, service_date, service_time, title, leader, location, notes, special_activity)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            service.id,
            service.date.format(DATE_FORMAT).to_string(),
            service.time,
            service.title,
            service.leader,
            service.location,
            service.notes,
            service.special_activity,
        ],
    )?;
    Ok(())
}

/// Services on or after `from`, earliest first.
pub fn get_services_from(conn: &Connection, from: NaiveDate) -> anyhow::Result<Vec<ServiceEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, service_date, service_time, title, leader, location, notes, special_activity
         FROM services WHERE service_date >= ?1 ORDER BY service_date ASC, service_time ASC",
    )?;
    let rows = stmt.query_map(params![from.format(DATE_FORMAT).to_string()], |row| {
        Ok(parse_service_row(row))
    })?;

    let mut services = vec![];
    for row in rows {
        services.push(row??);
    }
    Ok(services)
}

fn parse_service_row(row: &rusqlite::Row) -> anyhow::Result<ServiceEntry> {
    let date_str: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
        .map_err(|e| anyhow::anyhow!("invalid service date '{date_str}': {e}"))?;

    Ok(ServiceEntry {
        id: row.get(0)?,
        date,
        time: row.get(2)?,
        title: row.get(3)?,
        leader: row.get(4)?,
        location: row.get(5)?,
        notes: row.get(6)?,
        special_activity: row.get(7)?,
    })
}

// ── Songs ──

pub fn insert_song(conn: &Connection, song: &SongEntry) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO songs (id, title, artist, song_key) VALUES (?1, ?2, ?3, ?4)",
        params![song.id, song.title, song.artist, song.key],
    )?;
    Ok(())
}

pub fn list_songs(conn: &Connection) -> anyhow::Result<Vec<SongEntry>> {
    let mut stmt = conn.prepare("SELECT id, title, artist, song_key FROM songs ORDER BY title")?;
    let rows = stmt.query_map([], |row| {
        Ok(SongEntry {
            id: row.get(0)?,
            title: row.get(1)?,
            artist: row.get(2)?,
            key: row.get(3)?,
        })
    })?;

    let mut songs = vec![];
    for row in rows {
        songs.push(row?);
    }
    Ok(songs)
}

// ── Chat messages ──

pub fn insert_assistant_message(
    conn: &Connection,
    room_id: &str,
    response: &BotResponse,
) -> anyhow::Result<String> {
    let id = uuid::Uuid::new_v4().to_string();
    let actions = serde_json::to_string(&response.actions)?;
    let now = Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string();

    conn.execute(
        "INSERT INTO chat_messages (id, room_id, sender_kind, sender_id, body, intent, mood, actions, created_at)
         VALUES (?1, ?2, ?3, NULL, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            room_id,
            ASSISTANT_SENDER,
            response.message,
            response.intent.as_str(),
            response.mood.as_str(),
            actions,
            now,
        ],
    )?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_db;
    use crate::models::{BotAction, Intent, Mood};

    fn member(id: &str, first: &str) -> DirectoryEntry {
        DirectoryEntry {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: "Santana".to_string(),
            role: None,
            voice_or_instrument: Some("Tenor".to_string()),
            birth_date: Some("1985-11-16".to_string()),
        }
    }

    #[test]
    fn test_inactive_members_are_hidden() {
        let conn = init_memory_db().unwrap();
        upsert_member(&conn, &member("1", "Pedro"), true).unwrap();
        upsert_member(&conn, &member("2", "María"), false).unwrap();

        let members = list_active_members(&conn).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, "1");
        assert_eq!(members[0].birth_date.as_deref(), Some("1985-11-16"));

        upsert_member(&conn, &member("2", "María"), true).unwrap();
        assert_eq!(list_active_members(&conn).unwrap().len(), 2);
    }

    #[test]
    fn test_services_from_date() {
        let conn = init_memory_db().unwrap();
        for (id, day) in [("b", 25), ("a", 18), ("c", 30)] {
            insert_service(
                &conn,
                &ServiceEntry {
                    id: id.to_string(),
                    date: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
                    time: None,
                    title: "Culto".to_string(),
                    leader: None,
                    location: None,
                    notes: None,
                    special_activity: None,
                },
            )
            .unwrap();
        }

        let from = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let ids: Vec<String> = get_services_from(&conn, from)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_assistant_message_is_tagged() {
        let conn = init_memory_db().unwrap();
        let response = BotResponse::new(Intent::SongSearch, Mood::Happy, "hola").with_actions(vec![
            BotAction::SelectSong {
                song_id: "s1".to_string(),
                song_name: "Sublime Gracia".to_string(),
                service_id: None,
                service_date: None,
            },
        ]);
        let id = insert_assistant_message(&conn, "room-1", &response).unwrap();

        let (room, sender, intent, mood, actions): (String, String, String, String, String) = conn
            .query_row(
                "SELECT room_id, sender_kind, intent, mood, actions FROM chat_messages WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .unwrap();
        assert_eq!(room, "room-1");
        assert_eq!(sender, "assistant");
        assert_eq!(intent, "song_search");
        assert_eq!(mood, response.mood.as_str());
        let stored: Vec<BotAction> = serde_json::from_str(&actions).unwrap();
        assert_eq!(stored, response.actions);
    }
}
