use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        -- checkmarks holds the habit's 31-slot boolean array as a JSON
        -- document; it is written whole at creation and patched per index
        -- afterwards, never re-allocated.
        CREATE TABLE IF NOT EXISTS habits (
            id          TEXT PRIMARY KEY,
            owner_email TEXT NOT NULL,
            name        TEXT NOT NULL,
            checkmarks  TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_habits_owner_created
            ON habits(owner_email, created_at);

        CREATE TABLE IF NOT EXISTS notes (
            id          TEXT PRIMARY KEY,
            local_key   INTEGER NOT NULL,
            content     TEXT NOT NULL,
            updated_at  TEXT NOT NULL,
            owner_email TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_notes_owner
            ON notes(owner_email);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
