//! Profiles kept as JSON documents on a storage provider

use super::{validate_user_id, RemoteProfileStore, RemoteResult};
use crate::error::StorageError;
use crate::storage::StorageProvider;
use crate::types::{Profile, RemoteBook};
use async_trait::async_trait;
use std::sync::Arc;

const PROFILE_PREFIX: &str = "profiles";

/// Profile store writing `profiles/<user_id>.json` documents
pub struct StorageProfileStore {
    storage: Arc<dyn StorageProvider>,
}

impl StorageProfileStore {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    fn profile_path(user_id: &str) -> RemoteResult<String> {
        validate_user_id(user_id)?;
        Ok(format!("{}/{}.json", PROFILE_PREFIX, user_id))
    }

    /// Ids of every user with a stored profile
    pub async fn user_ids(&self) -> RemoteResult<Vec<String>> {
        let names = self.storage.list(PROFILE_PREFIX).await?;
        Ok(names
            .iter()
            .filter_map(|name| name.strip_suffix(".json"))
            .map(str::to_string)
            .collect())
    }

    /// Remove a stored profile, returning whether one existed
    pub async fn delete_profile(&self, user_id: &str) -> RemoteResult<bool> {
        let path = Self::profile_path(user_id)?;
        if !self.storage.exists(&path).await? {
            return Ok(false);
        }
        self.storage.delete(&path).await?;
        tracing::debug!(user_id, "Deleted profile");
        Ok(true)
    }
}

#[async_trait]
impl RemoteProfileStore for StorageProfileStore {
    async fn get_profile(&self, user_id: &str) -> RemoteResult<Profile> {
        let path = Self::profile_path(user_id)?;
        match self.storage.read(&path).await {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(StorageError::NotFound(_)) => Ok(Profile::empty(user_id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_books(&self, user_id: &str, books: Vec<RemoteBook>) -> RemoteResult<()> {
        let mut profile = self.get_profile(user_id).await?;
        profile.books = books;

        let path = Self::profile_path(user_id)?;
        let data = serde_json::to_vec_pretty(&profile)?;
        self.storage.write(&path, data).await?;
        tracing::debug!(user_id, books = profile.books.len(), "Stored profile");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::storage::{LocalStorage, MemoryStorage};

    #[tokio::test]
    async fn test_unknown_user_is_empty() {
        let store = StorageProfileStore::new(Arc::new(MemoryStorage::new()));
        let profile = store.get_profile("newcomer").await.unwrap();
        assert_eq!(profile, Profile::empty("newcomer"));
    }

    #[tokio::test]
    async fn test_set_books_keeps_profile_fields() {
        let storage = Arc::new(MemoryStorage::new());
        let seeded = Profile {
            user_id: "reader".to_string(),
            display_name: Some("Avid Reader".to_string()),
            books: vec![],
        };
        storage
            .write("profiles/reader.json", serde_json::to_vec(&seeded).unwrap())
            .await
            .unwrap();

        let store = StorageProfileStore::new(storage);
        store
            .set_books("reader", vec![RemoteBook::new("1", "Emma", "Jane Austen")])
            .await
            .unwrap();

        let profile = store.get_profile("reader").await.unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Avid Reader"));
        assert_eq!(profile.books[0].title, "Emma");
    }

    #[tokio::test]
    async fn test_persists_on_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = StorageProfileStore::new(Arc::new(LocalStorage::new(dir.path())));
        store
            .set_books("reader", vec![RemoteBook::new("1", "Dune", "Frank Herbert")])
            .await
            .unwrap();

        let reopened = StorageProfileStore::new(Arc::new(LocalStorage::new(dir.path())));
        assert_eq!(reopened.get_profile("reader").await.unwrap().books.len(), 1);
        assert_eq!(reopened.user_ids().await.unwrap(), vec!["reader"]);
    }

    #[tokio::test]
    async fn test_delete_profile() {
        let store = StorageProfileStore::new(Arc::new(MemoryStorage::new()));
        store
            .set_books("reader", vec![RemoteBook::new("1", "Emma", "Jane Austen")])
            .await
            .unwrap();

        assert_eq!(store.user_ids().await.unwrap(), vec!["reader"]);
        assert!(store.delete_profile("reader").await.unwrap());
        assert!(store.user_ids().await.unwrap().is_empty());
        assert!(!store.delete_profile("reader").await.unwrap());
        assert!(store.get_profile("reader").await.unwrap().books.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_an_error() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .write("profiles/reader.json", b"not json".to_vec())
            .await
            .unwrap();

        let store = StorageProfileStore::new(storage);
        let err = store.get_profile("reader").await.unwrap_err();
        assert!(matches!(err, RemoteError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_rejects_unsafe_user_id() {
        let store = StorageProfileStore::new(Arc::new(MemoryStorage::new()));
        assert!(store.get_profile("../secrets").await.is_err());
    }
}
