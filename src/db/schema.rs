use anyhow::{Context, Result};
use rusqlite::Connection;

/// Recorded in SQLite's `user_version` header field once the schema exists.
pub const SCHEMA_VERSION: i32 = 1;

const LOCAL_STORAGE_SQL: &str = include_str!("migrations/001_initial.sql");

pub fn schema_version(conn: &Connection) -> Result<i32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

/// Create the `local_storage` table on a fresh file. Already-current files are left alone.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let version = schema_version(conn)?;
    if version >= SCHEMA_VERSION {
        return Ok(());
    }

    tracing::info!(
        "Upgrading storage schema from version {} to {}",
        version,
        SCHEMA_VERSION
    );
    conn.execute_batch(&format!(
        "BEGIN; {LOCAL_STORAGE_SQL} PRAGMA user_version = {SCHEMA_VERSION}; COMMIT;"
    ))
    .context("Failed to create local_storage table")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_create_local_storage_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);
        run_migrations(&conn).unwrap();

        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='local_storage'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO local_storage (key, value, updated_at) VALUES ('k', 'v', 'now')",
            [],
        )
        .unwrap();
        run_migrations(&conn).unwrap();

        let value: String = conn
            .query_row("SELECT value FROM local_storage WHERE key = 'k'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(value, "v");
    }
}
