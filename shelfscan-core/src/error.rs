//! Error types for Shelfscan Core

use thiserror::Error;

/// Errors surfaced by the recognition pipeline
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// Text extraction failed, no candidates were produced
    #[error("Recognition failed: {0}")]
    RecognitionFailed(String),

    /// A manual lookup could not reach the metadata service
    #[error("Lookup failed: {0}")]
    LookupFailed(String),
}

impl From<ExtractionError> for RecognitionError {
    fn from(err: ExtractionError) -> Self {
        RecognitionError::RecognitionFailed(err.to_string())
    }
}

/// Errors raised by a text-extraction backend
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Image unavailable: {0}")]
    ImageUnavailable(String),

    #[error("Extraction backend error: {0}")]
    Backend(String),
}

/// Errors raised by a metadata service
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl From<reqwest::Error> for MetadataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MetadataError::InvalidResponse(err.to_string())
        } else {
            MetadataError::Http(err.to_string())
        }
    }
}

/// Errors from the local library store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Errors from a remote profile store
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Remote unavailable: {0}")]
    Unavailable(String),

    #[error("Remote rejected request: {0}")]
    Rejected(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Serialization(err.to_string())
        } else if let Some(status) = err.status() {
            RemoteError::Rejected(status.to_string())
        } else {
            RemoteError::Unavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Serialization(err.to_string())
    }
}

impl From<StorageError> for RemoteError {
    fn from(err: StorageError) -> Self {
        RemoteError::Unavailable(err.to_string())
    }
}

/// Errors that abort a library sync
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Sync failed: {0}")]
    SyncFailed(String),
}

impl From<RemoteError> for SyncError {
    fn from(err: RemoteError) -> Self {
        SyncError::SyncFailed(err.to_string())
    }
}

/// Errors that occur during blob storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}
