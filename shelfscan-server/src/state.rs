//! Application state

use anyhow::{Context, Result};
use shelfscan_core::remote::StorageProfileStore;
use shelfscan_core::storage::{LocalStorage, StorageProvider};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Profile documents, one per user
    pub profiles: Arc<StorageProfileStore>,

    /// Base path for storage
    pub storage_path: PathBuf,

    /// Channel for SSE events
    pub event_tx: broadcast::Sender<ServerEvent>,
}

/// Server-sent events
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// A user's book list was replaced
    BooksUpdated { user_id: String, count: usize },

    /// A user's profile was deleted
    ProfileDeleted { user_id: String },

    /// An error occurred
    Error { message: String },
}

impl AppState {
    /// Create state backed by `SHELFSCAN_STORAGE_PATH` (default `./shelfscan_data`)
    pub async fn new() -> Result<Self> {
        let storage_path = std::env::var("SHELFSCAN_STORAGE_PATH")
            .unwrap_or_else(|_| "./shelfscan_data".to_string());
        let storage_path = PathBuf::from(storage_path);

        tokio::fs::create_dir_all(storage_path.join("profiles"))
            .await
            .with_context(|| format!("creating {}", storage_path.display()))?;

        let storage = Arc::new(LocalStorage::new(&storage_path));
        Ok(Self::with_storage(storage, storage_path))
    }

    /// Create state over any storage provider
    pub fn with_storage(storage: Arc<dyn StorageProvider>, storage_path: PathBuf) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            profiles: Arc::new(StorageProfileStore::new(storage)),
            storage_path,
            event_tx,
        }
    }

    /// Subscribe to server events
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.event_tx.subscribe()
    }

    /// Broadcast an event
    pub fn broadcast(&self, event: ServerEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}
