// Local database migrations
// Migrations are forward-only. Never edit or delete a migration after it ships.

use crate::error::StoreError;
use rusqlite::Connection;

/// All migrations in order. Each migration is a SQL string.
const MIGRATIONS: &[&str] = &[
    // Migration 1: libraries and book records
    r#"
    CREATE TABLE libraries (
        name TEXT PRIMARY KEY COLLATE NOCASE,
        created_at TEXT NOT NULL
    );

    -- Books reference their library by name, without a foreign key
    CREATE TABLE books (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL COLLATE NOCASE,
        author TEXT NOT NULL COLLATE NOCASE,
        series_name TEXT,
        series_number INTEGER,
        cover_url TEXT NOT NULL,
        genre TEXT,
        published_year INTEGER,
        description TEXT,
        isbn TEXT,
        publisher TEXT,
        page_count INTEGER,
        language TEXT,
        library_name TEXT NOT NULL COLLATE NOCASE,
        is_read INTEGER NOT NULL DEFAULT 0,
        is_to_read INTEGER NOT NULL DEFAULT 0,
        scanned_at TEXT NOT NULL,
        UNIQUE(title, author)
    );

    CREATE INDEX idx_books_library ON books(library_name);
    "#,
    // Migration 2: ISBN lookups
    r#"
    CREATE INDEX idx_books_isbn ON books(isbn);
    "#,
];

/// Get current schema version from database
fn get_schema_version(conn: &Connection) -> Result<u32, StoreError> {
    let version: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

/// Run all pending migrations; a no-op on an up-to-date database
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    let current_version = get_schema_version(conn)?;
    let target_version = MIGRATIONS.len() as u32;

    if current_version > target_version {
        return Err(StoreError::Backend(format!(
            "database schema version {} is newer than this build supports (max {})",
            current_version, target_version
        )));
    }

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let migration_version = (i + 1) as u32;
        if migration_version <= current_version {
            continue;
        }

        conn.execute_batch(&format!(
            "BEGIN;\n{}\nPRAGMA user_version = {};\nCOMMIT;",
            migration, migration_version
        ))?;
        tracing::debug!(version = migration_version, "Applied migration");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), MIGRATIONS.len() as u32);
    }

    #[test]
    fn test_newer_schema_is_refused() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA user_version = 99").unwrap();
        assert!(matches!(run_migrations(&conn), Err(StoreError::Backend(_))));
    }
}
