use rusqlite::Connection;
use tracing::info;

use crate::error::StoreError;

/// Bring the schema up to the latest version.
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )?;

    let current: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current < 1 {
        apply_v1(conn)?;
        info!("applied migration v1: initial_schema");
    }

    Ok(())
}

// Timestamps are unix milliseconds.
fn apply_v1(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS faqs (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            question    TEXT NOT NULL,
            answer      TEXT NOT NULL,
            language    VARCHAR(10) NOT NULL DEFAULT 'en',
            category    VARCHAR(50),
            created_at  INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_faqs_language_created ON faqs(language, created_at DESC);

        CREATE TABLE IF NOT EXISTS documents (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            filename     TEXT NOT NULL,
            content      TEXT,
            upload_date  INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS chat_history (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id    TEXT NOT NULL,
            user_message  TEXT NOT NULL,
            bot_response  TEXT NOT NULL,
            timestamp     INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_chat_history_session ON chat_history(session_id, timestamp DESC);

        CREATE TABLE IF NOT EXISTS settings (
            id     INTEGER PRIMARY KEY AUTOINCREMENT,
            key    TEXT UNIQUE NOT NULL,
            value  TEXT NOT NULL
        );

        INSERT INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )?;
    Ok(())
}
