//! Remote per-user profile stores

mod http;
mod stored;

pub use http::HttpProfileStore;
pub use stored::StorageProfileStore;

use crate::error::RemoteError;
use crate::types::{Profile, RemoteBook};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Result type for remote store operations
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Server-side store of each user's profile and book list
#[async_trait]
pub trait RemoteProfileStore: Send + Sync {
    /// Fetch a profile; users the store has never seen read as empty
    async fn get_profile(&self, user_id: &str) -> RemoteResult<Profile>;

    /// Replace the user's book list
    async fn set_books(&self, user_id: &str, books: Vec<RemoteBook>) -> RemoteResult<()>;
}

/// Check that a user id is safe to use as a document name or URL segment
pub fn validate_user_id(user_id: &str) -> RemoteResult<()> {
    let valid = !user_id.is_empty()
        && user_id.len() <= 128
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RemoteError::Rejected(format!("invalid user id: {:?}", user_id)))
    }
}

/// In-memory profile store (for testing)
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user's book list
    pub fn with_books(self, user_id: &str, books: Vec<RemoteBook>) -> Self {
        if let Ok(mut profiles) = self.profiles.write() {
            profiles.insert(
                user_id.to_string(),
                Profile {
                    books,
                    ..Profile::empty(user_id)
                },
            );
        }
        self
    }

    fn poisoned() -> RemoteError {
        RemoteError::Unavailable("profile store lock poisoned".to_string())
    }
}

#[async_trait]
impl RemoteProfileStore for MemoryProfileStore {
    async fn get_profile(&self, user_id: &str) -> RemoteResult<Profile> {
        validate_user_id(user_id)?;
        Ok(self
            .profiles
            .read()
            .map_err(|_| Self::poisoned())?
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| Profile::empty(user_id)))
    }

    async fn set_books(&self, user_id: &str, books: Vec<RemoteBook>) -> RemoteResult<()> {
        validate_user_id(user_id)?;
        let mut profiles = self.profiles.write().map_err(|_| Self::poisoned())?;
        profiles
            .entry(user_id.to_string())
            .or_insert_with(|| Profile::empty(user_id))
            .books = books;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_user_id() {
        assert!(validate_user_id("reader_42-a").is_ok());
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("../admin").is_err());
        assert!(validate_user_id("a b").is_err());
    }

    #[tokio::test]
    async fn test_memory_profile_store() {
        let store = MemoryProfileStore::new();
        assert!(store.get_profile("reader").await.unwrap().books.is_empty());

        store
            .set_books("reader", vec![RemoteBook::new("1", "Dune", "Frank Herbert")])
            .await
            .unwrap();
        let profile = store.get_profile("reader").await.unwrap();
        assert_eq!(profile.user_id, "reader");
        assert_eq!(profile.books.len(), 1);
    }
}
