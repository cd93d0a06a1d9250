use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS snapshots (
            event_id TEXT NOT NULL,
            day TEXT NOT NULL,
            captured_at TEXT NOT NULL,
            report_text TEXT NOT NULL,
            queries_used TEXT NOT NULL DEFAULT '[]',
            source_urls TEXT NOT NULL DEFAULT '[]',
            PRIMARY KEY (event_id, day)
        );

        CREATE INDEX IF NOT EXISTS idx_snapshots_day ON snapshots(day);
        ",
    )
    .map_err(|e| format!("Migration failed: {e}"))
}
