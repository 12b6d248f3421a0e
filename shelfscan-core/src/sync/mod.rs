//! Library sync between the local collection and a user's remote profile

mod merge;

pub use merge::{local_is_converged, merge_books};

use crate::error::SyncError;
use crate::remote::RemoteProfileStore;
use crate::store::LocalBookStore;
use crate::types::{BookRecord, RemoteBook, DEFAULT_LIBRARY};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of a sync or upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Success,
    Failure,
}

/// Report handed back to the caller after a sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub status: SyncStatus,
    pub message: String,
    pub books_merged: usize,
}

impl SyncReport {
    pub fn success(message: impl Into<String>, books_merged: usize) -> Self {
        Self {
            status: SyncStatus::Success,
            message: message.into(),
            books_merged,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: SyncStatus::Failure,
            message: message.into(),
            books_merged: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SyncStatus::Success
    }
}

impl From<SyncError> for SyncReport {
    fn from(err: SyncError) -> Self {
        SyncReport::failure(err.to_string())
    }
}

/// Reconciles the local store with a remote profile store
///
/// Remote reads and writes fail closed: any remote error aborts before the
/// local store is touched. Local reads are least trusted and degrade to an
/// empty list. Callers must not run two syncs for the same user at once.
pub struct LibrarySync {
    remote: Arc<dyn RemoteProfileStore>,
    local: Arc<dyn LocalBookStore>,
    default_library: String,
}

impl LibrarySync {
    pub fn new(remote: Arc<dyn RemoteProfileStore>, local: Arc<dyn LocalBookStore>) -> Self {
        Self {
            remote,
            local,
            default_library: DEFAULT_LIBRARY.to_string(),
        }
    }

    /// Library assigned to remote books that carry none
    pub fn with_default_library(mut self, name: impl Into<String>) -> Self {
        self.default_library = name.into();
        self
    }

    /// Sync and fold any error into a failure report
    pub async fn sync(&self, user_id: &str) -> SyncReport {
        match self.try_sync(user_id).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Sync failed");
                e.into()
            }
        }
    }

    pub async fn try_sync(&self, user_id: &str) -> Result<SyncReport, SyncError> {
        let profile = self.remote.get_profile(user_id).await?;
        let remote = profile.books;
        let local = self.local_books().await;

        tracing::debug!(
            user_id,
            remote = remote.len(),
            local = local.len(),
            "Starting sync"
        );

        match (remote.is_empty(), local.is_empty()) {
            (false, true) => {
                let records: Vec<BookRecord> = remote
                    .iter()
                    .map(|book| book.to_record(&self.default_library))
                    .collect();
                self.local
                    .add_books(records)
                    .await
                    .map_err(|e| SyncError::SyncFailed(format!("Writing local books: {}", e)))?;

                tracing::info!(user_id, books = remote.len(), "Copied remote books to local");
                Ok(SyncReport::success(
                    format!("Restored {} books from your account", remote.len()),
                    remote.len(),
                ))
            }
            (true, false) => {
                let books: Vec<RemoteBook> = local.iter().map(RemoteBook::from).collect();
                self.remote.set_books(user_id, books).await?;

                tracing::info!(user_id, books = local.len(), "Pushed local books to remote");
                Ok(SyncReport::success(
                    format!("Backed up {} books to your account", local.len()),
                    local.len(),
                ))
            }
            (false, false) => self.merge(user_id, remote, local).await,
            (true, true) => Ok(SyncReport::success("Nothing to sync", 0)),
        }
    }

    async fn merge(
        &self,
        user_id: &str,
        remote: Vec<RemoteBook>,
        local: Vec<BookRecord>,
    ) -> Result<SyncReport, SyncError> {
        let (merged, appended) = merge_books(&remote, &local);

        if appended > 0 {
            self.remote.set_books(user_id, merged.clone()).await?;
            tracing::info!(user_id, appended, "Wrote merged list to remote");
        }

        if !local_is_converged(&merged, &local, &self.default_library) {
            let records: Vec<BookRecord> = merged
                .iter()
                .map(|book| book.to_record(&self.default_library))
                .collect();
            self.local
                .replace_books(records)
                .await
                .map_err(|e| SyncError::SyncFailed(format!("Rewriting local books: {}", e)))?;
            tracing::info!(user_id, books = merged.len(), "Rewrote local books");
        }

        Ok(SyncReport::success(
            format!("Merged {} books", merged.len()),
            merged.len(),
        ))
    }

    /// Push the local collection to the remote, replacing its list
    pub async fn upload_local(&self, user_id: &str) -> SyncReport {
        let local = self.local_books().await;
        if local.is_empty() {
            return SyncReport::success("No local books to upload", 0);
        }

        let books: Vec<RemoteBook> = local.iter().map(RemoteBook::from).collect();
        match self.remote.set_books(user_id, books).await {
            Ok(()) => {
                tracing::info!(user_id, books = local.len(), "Uploaded local books");
                SyncReport::success(format!("Uploaded {} books", local.len()), local.len())
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Upload failed");
                SyncError::from(e).into()
            }
        }
    }

    async fn local_books(&self) -> Vec<BookRecord> {
        match self.local.list_books().await {
            Ok(books) => books,
            Err(e) => {
                tracing::warn!(error = %e, "Reading local books failed, treating as empty");
                Vec::new()
            }
        }
    }
}
