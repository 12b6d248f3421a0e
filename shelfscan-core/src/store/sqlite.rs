//! SQLite-backed library store

use super::schema::run_migrations;
use super::{LocalBookStore, StoreResult};
use crate::error::StoreError;
use crate::types::{BookRecord, CandidateBook, Library, SeriesInfo};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const BOOK_COLUMNS: &str = "id, title, author, series_name, series_number, cover_url, genre, \
     published_year, description, isbn, publisher, page_count, language, library_name, \
     is_read, is_to_read, scanned_at";

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn book_from_row(row: &Row) -> rusqlite::Result<BookRecord> {
    let series_name: Option<String> = row.get(3)?;
    let series_number: Option<u32> = row.get(4)?;

    Ok(BookRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        series: series_name.map(|name| SeriesInfo::new(name, series_number)),
        cover_url: row.get(5)?,
        genre: row.get(6)?,
        published_year: row.get(7)?,
        description: row.get(8)?,
        isbn: row.get(9)?,
        publisher: row.get(10)?,
        page_count: row.get(11)?,
        language: row.get(12)?,
        library_name: row.get(13)?,
        is_read: row.get(14)?,
        is_to_read: row.get(15)?,
        scanned_at: parse_timestamp(16, row.get(16)?)?,
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Insert a book row; `or_ignore` silently skips duplicates
fn insert_book(conn: &Connection, book: &BookRecord, or_ignore: bool) -> rusqlite::Result<usize> {
    let verb = if or_ignore { "INSERT OR IGNORE" } else { "INSERT" };
    let sql = format!(
        "{} INTO books ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        verb, BOOK_COLUMNS
    );
    conn.execute(
        &sql,
        params![
            book.id,
            book.title,
            book.author,
            book.series.as_ref().map(|s| s.name.as_str()),
            book.series.as_ref().and_then(|s| s.number),
            book.cover_url,
            book.genre,
            book.published_year,
            book.description,
            book.isbn,
            book.publisher,
            book.page_count,
            book.language,
            book.library_name,
            book.is_read,
            book.is_to_read,
            format_timestamp(&book.scanned_at),
        ],
    )
}

fn ensure_library_row(conn: &Connection, name: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO libraries (name, created_at) VALUES (?1, ?2)",
        params![name, format_timestamp(&Utc::now())],
    )?;
    Ok(())
}

fn insert_unique(conn: &Connection, books: Vec<BookRecord>) -> rusqlite::Result<Vec<BookRecord>> {
    let mut inserted = Vec::new();
    for book in books {
        ensure_library_row(conn, &book.library_name)?;
        if insert_book(conn, &book, true)? == 1 {
            inserted.push(book);
        }
    }
    Ok(inserted)
}

/// Handle to the single-file library database
///
/// Opened once with [`SqliteStore::open`] and shut down with
/// [`SqliteStore::close`]. Opening an existing file is idempotent: pending
/// migrations run, current schemas are left alone.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create a database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Backend(format!("{}: {}", parent.display(), e)))?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        run_migrations(&conn)?;
        tracing::debug!(path = %path.display(), "Opened library database");

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database file, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the connection, surfacing any error SQLite reports
    pub fn close(self) -> StoreResult<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| StoreError::Backend("database lock poisoned".to_string()))?;
        conn.close().map_err(|(_, e)| StoreError::Database(e))
    }

    fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> StoreResult<T>) -> StoreResult<T> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Backend("database lock poisoned".to_string()))?;
        f(&mut conn)
    }

    // Libraries

    /// Create an empty library
    pub fn create_library(&self, name: &str) -> StoreResult<Library> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Backend("library name must not be empty".to_string()));
        }

        self.with_conn(|conn| {
            let created_at = Utc::now();
            conn.execute(
                "INSERT INTO libraries (name, created_at) VALUES (?1, ?2)",
                params![name, format_timestamp(&created_at)],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    StoreError::Duplicate(format!("library {}", name))
                } else {
                    e.into()
                }
            })?;

            Ok(Library {
                name: name.to_string(),
                created_at,
                book_count: 0,
            })
        })
    }

    /// Create the library if it does not exist yet
    pub fn ensure_library(&self, name: &str) -> StoreResult<()> {
        self.with_conn(|conn| Ok(ensure_library_row(conn, name.trim())?))
    }

    /// All libraries with their derived book counts, by name
    pub fn list_libraries(&self) -> StoreResult<Vec<Library>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT l.name, l.created_at, COUNT(b.id)
                 FROM libraries l
                 LEFT JOIN books b ON b.library_name = l.name
                 GROUP BY l.name
                 ORDER BY l.name",
            )?;
            let libraries = stmt
                .query_map([], |row| {
                    let count: i64 = row.get(2)?;
                    Ok(Library {
                        name: row.get(0)?,
                        created_at: parse_timestamp(1, row.get(1)?)?,
                        book_count: count as usize,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(libraries)
        })
    }

    /// Delete a library and every book in it, returning the number of books removed
    pub fn delete_library(&self, name: &str) -> StoreResult<usize> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let removed = tx.execute("DELETE FROM books WHERE library_name = ?1", params![name])?;
            let deleted = tx.execute("DELETE FROM libraries WHERE name = ?1", params![name])?;
            if deleted == 0 {
                return Err(StoreError::NotFound(format!("library {}", name)));
            }
            tx.commit()?;
            Ok(removed)
        })
    }

    // Books

    /// Insert one book; an existing id or (title, author) is a duplicate
    pub fn add_book(&self, book: &BookRecord) -> StoreResult<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            ensure_library_row(&tx, &book.library_name)?;
            insert_book(&tx, book, false).map_err(|e| {
                if is_constraint_violation(&e) {
                    StoreError::Duplicate(format!("{} by {}", book.title, book.author))
                } else {
                    e.into()
                }
            })?;
            tx.commit()?;
            Ok(())
        })
    }

    /// Persist an accepted candidate into a library, creating the library if needed
    pub fn accept_candidate(
        &self,
        candidate: &CandidateBook,
        library_name: &str,
    ) -> StoreResult<BookRecord> {
        let record = BookRecord::from_candidate(candidate, library_name.trim());
        self.add_book(&record)?;
        tracing::info!(title = %record.title, library = %record.library_name, "Accepted candidate");
        Ok(record)
    }

    pub fn get_book(&self, id: &str) -> StoreResult<Option<BookRecord>> {
        self.with_conn(|conn| {
            let book = conn
                .query_row(
                    &format!("SELECT {} FROM books WHERE id = ?1", BOOK_COLUMNS),
                    params![id],
                    book_from_row,
                )
                .optional()?;
            Ok(book)
        })
    }

    pub fn books_in_library(&self, name: &str) -> StoreResult<Vec<BookRecord>> {
        self.query_books("WHERE library_name = ?1 ORDER BY title", &[&name])
    }

    /// Books whose title, author or ISBN contains `query` (case-insensitive)
    pub fn search_books(&self, query: &str) -> StoreResult<Vec<BookRecord>> {
        let escaped = query
            .trim()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{}%", escaped);
        self.query_books(
            "WHERE title LIKE ?1 ESCAPE '\\' OR author LIKE ?1 ESCAPE '\\' OR isbn LIKE ?1 ESCAPE '\\' \
             ORDER BY title",
            &[&pattern],
        )
    }

    fn query_books(
        &self,
        clause: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> StoreResult<Vec<BookRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {} FROM books {}", BOOK_COLUMNS, clause))?;
            let books = stmt
                .query_map(params, book_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(books)
        })
    }

    fn update_book(&self, id: &str, sql: &str, value: &dyn rusqlite::ToSql) -> StoreResult<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(sql, params![value, id])?;
            if changed == 0 {
                return Err(StoreError::NotFound(format!("book {}", id)));
            }
            Ok(())
        })
    }

    pub fn set_read(&self, id: &str, is_read: bool) -> StoreResult<()> {
        self.update_book(id, "UPDATE books SET is_read = ?1 WHERE id = ?2", &is_read)
    }

    pub fn set_to_read(&self, id: &str, is_to_read: bool) -> StoreResult<()> {
        self.update_book(id, "UPDATE books SET is_to_read = ?1 WHERE id = ?2", &is_to_read)
    }

    /// Move a book to another library, creating the library if needed
    pub fn move_book(&self, id: &str, library_name: &str) -> StoreResult<()> {
        let library_name = library_name.trim();
        self.ensure_library(library_name)?;
        self.update_book(
            id,
            "UPDATE books SET library_name = ?1 WHERE id = ?2",
            &library_name,
        )
    }

    pub fn delete_book(&self, id: &str) -> StoreResult<()> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM books WHERE id = ?1", params![id])?;
            if deleted == 0 {
                return Err(StoreError::NotFound(format!("book {}", id)));
            }
            Ok(())
        })
    }

    fn all_books(&self) -> StoreResult<Vec<BookRecord>> {
        self.query_books("ORDER BY rowid", &[])
    }
}

#[async_trait]
impl LocalBookStore for SqliteStore {
    async fn list_books(&self) -> StoreResult<Vec<BookRecord>> {
        self.all_books()
    }

    async fn add_books(&self, books: Vec<BookRecord>) -> StoreResult<Vec<BookRecord>> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let inserted = insert_unique(&tx, books)?;
            tx.commit()?;
            Ok(inserted)
        })
    }

    async fn clear_books(&self) -> StoreResult<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM books", [])?;
            Ok(())
        })
    }

    /// Clear and refill in one transaction
    async fn replace_books(&self, books: Vec<BookRecord>) -> StoreResult<Vec<BookRecord>> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM books", [])?;
            let inserted = insert_unique(&tx, books)?;
            tx.commit()?;
            Ok(inserted)
        })
    }
}
