use crate::domain::entities::snapshot::Snapshot;
use crate::domain::error::DomainError;
use crate::domain::ports::snapshot_store::SnapshotStore;
use crate::domain::values::day_stamp::DayStamp;
use chrono::DateTime;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;

pub struct SqliteSnapshotStore {
    conn: Mutex<Connection>,
}

impl SqliteSnapshotStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn row_to_snapshot(row: &rusqlite::Row) -> Result<Snapshot, rusqlite::Error> {
        let day_str: String = row.get(1)?;
        let captured_str: String = row.get(2)?;
        let queries_str: String = row.get(4)?;
        let urls_str: String = row.get(5)?;

        Ok(Snapshot {
            event_id: row.get(0)?,
            day: day_str
                .parse()
                .map_err(|_| rusqlite::Error::InvalidParameterName(day_str.clone()))?,
            captured_at: DateTime::parse_from_rfc3339(&captured_str)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|_| rusqlite::Error::InvalidParameterName(captured_str.clone()))?,
            report_text: row.get(3)?,
            queries_used: serde_json::from_str(&queries_str).unwrap_or_default(),
            source_urls: serde_json::from_str(&urls_str).unwrap_or_default(),
        })
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn put(&self, snapshot: &Snapshot) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Persistence(e.to_string()))?;
        conn.execute(
            "INSERT INTO snapshots (event_id, day, captured_at, report_text, queries_used, source_urls)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(event_id, day) DO UPDATE SET
                 captured_at = excluded.captured_at,
                 report_text = excluded.report_text,
                 queries_used = excluded.queries_used,
                 source_urls = excluded.source_urls",
            params![
                snapshot.event_id,
                snapshot.day.to_string(),
                snapshot.captured_at.to_rfc3339(),
                snapshot.report_text,
                serde_json::to_string(&snapshot.queries_used).unwrap_or_default(),
                serde_json::to_string(&snapshot.source_urls).unwrap_or_default(),
            ],
        )
        .map_err(|e| DomainError::Persistence(format!("Failed to store snapshot: {e}")))?;
        Ok(())
    }

    fn get(&self, event_id: &str, day: DayStamp) -> Result<Option<Snapshot>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Persistence(e.to_string()))?;
        conn.query_row(
            "SELECT event_id, day, captured_at, report_text, queries_used, source_urls
             FROM snapshots WHERE event_id = ?1 AND day = ?2",
            params![event_id, day.to_string()],
            Self::row_to_snapshot,
        )
        .optional()
        .map_err(|e| DomainError::Persistence(format!("Failed to read snapshot: {e}")))
    }

    fn count_for_day(&self, day: DayStamp) -> Result<usize, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Persistence(e.to_string()))?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM snapshots WHERE day = ?1",
                params![day.to_string()],
                |row| row.get(0),
            )
            .map_err(|e| DomainError::Persistence(format!("Failed to count snapshots: {e}")))?;
        Ok(count as usize)
    }
}
