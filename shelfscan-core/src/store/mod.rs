//! Local (on-device) book stores

mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::StoreError;
use crate::types::BookRecord;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::RwLock;

/// Result type for local store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The local collection as seen by library sync
#[async_trait]
pub trait LocalBookStore: Send + Sync {
    /// All book records, in insertion order
    async fn list_books(&self) -> StoreResult<Vec<BookRecord>>;

    /// Insert records, skipping any whose id or (title, author) is already
    /// present. Returns the records actually inserted.
    async fn add_books(&self, books: Vec<BookRecord>) -> StoreResult<Vec<BookRecord>>;

    /// Remove every book record; libraries are kept
    async fn clear_books(&self) -> StoreResult<()>;

    /// Replace the whole collection
    async fn replace_books(&self, books: Vec<BookRecord>) -> StoreResult<Vec<BookRecord>> {
        self.clear_books().await?;
        self.add_books(books).await
    }
}

/// In-memory book store (for testing)
#[derive(Default)]
pub struct MemoryBookStore {
    books: RwLock<Vec<BookRecord>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `books`, deduplicated like [`LocalBookStore::add_books`]
    pub fn with_books(books: Vec<BookRecord>) -> Self {
        let store = Self::new();
        if let Ok(mut held) = store.books.write() {
            insert_unique(&mut held, books);
        }
        store
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("memory store lock poisoned".to_string())
    }
}

fn insert_unique(held: &mut Vec<BookRecord>, books: Vec<BookRecord>) -> Vec<BookRecord> {
    let mut ids: HashSet<String> = held.iter().map(|b| b.id.clone()).collect();
    let mut identities: HashSet<(String, String)> = held.iter().map(BookRecord::identity).collect();

    let mut inserted = Vec::new();
    for book in books {
        if ids.contains(&book.id) || identities.contains(&book.identity()) {
            continue;
        }
        ids.insert(book.id.clone());
        identities.insert(book.identity());
        held.push(book.clone());
        inserted.push(book);
    }
    inserted
}

#[async_trait]
impl LocalBookStore for MemoryBookStore {
    async fn list_books(&self) -> StoreResult<Vec<BookRecord>> {
        Ok(self.books.read().map_err(|_| Self::poisoned())?.clone())
    }

    async fn add_books(&self, books: Vec<BookRecord>) -> StoreResult<Vec<BookRecord>> {
        let mut held = self.books.write().map_err(|_| Self::poisoned())?;
        Ok(insert_unique(&mut held, books))
    }

    async fn clear_books(&self) -> StoreResult<()> {
        self.books.write().map_err(|_| Self::poisoned())?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_books_skips_duplicates() {
        let store = MemoryBookStore::new();
        let inserted = store
            .add_books(vec![
                BookRecord::new("1", "Dune", "Frank Herbert", "Default Library"),
                BookRecord::new("2", "dune", "FRANK HERBERT", "Default Library"),
                BookRecord::new("1", "Emma", "Jane Austen", "Default Library"),
                BookRecord::new("3", "Emma", "Jane Austen", "Default Library"),
            ])
            .await
            .unwrap();

        let ids: Vec<&str> = inserted.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(store.list_books().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_replace_books() {
        let store = MemoryBookStore::with_books(vec![BookRecord::new(
            "1",
            "Dune",
            "Frank Herbert",
            "Default Library",
        )]);
        store
            .replace_books(vec![BookRecord::new("9", "Emma", "Jane Austen", "Classics")])
            .await
            .unwrap();

        let books = store.list_books().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, "9");
    }
}
