//! Runtime configuration

use crate::types::DEFAULT_LIBRARY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Google Books volumes endpoint
pub const DEFAULT_METADATA_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Cover shown when the metadata service has none
pub const DEFAULT_PLACEHOLDER_COVER: &str =
    "https://via.placeholder.com/128x192.png?text=No+Cover";

/// Upper bound on candidates returned by one recognition
pub const DEFAULT_MAX_CANDIDATES: usize = 5;

/// Settings shared by the pipeline, the stores and the binaries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// Metadata service volumes endpoint
    pub metadata_url: String,

    /// Optional metadata service API key
    pub metadata_api_key: Option<String>,

    pub placeholder_cover_url: String,
    pub max_candidates: usize,

    /// Library assigned to books that arrive without one
    pub default_library: String,

    /// Local library database file
    pub db_path: PathBuf,

    /// Base URL of the remote profile server
    pub remote_url: String,

    pub http_timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            metadata_api_key: None,
            placeholder_cover_url: DEFAULT_PLACEHOLDER_COVER.to_string(),
            max_candidates: DEFAULT_MAX_CANDIDATES,
            default_library: DEFAULT_LIBRARY.to_string(),
            db_path: PathBuf::from("./shelfscan.db"),
            remote_url: "http://127.0.0.1:3000".to_string(),
            http_timeout_secs: 10,
        }
    }
}

impl ScanConfig {
    /// Build configuration from `SHELFSCAN_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("SHELFSCAN_METADATA_URL") {
            config.metadata_url = url;
        }
        config.metadata_api_key = lookup("SHELFSCAN_METADATA_API_KEY").filter(|k| !k.is_empty());
        if let Some(cover) = lookup("SHELFSCAN_PLACEHOLDER_COVER") {
            config.placeholder_cover_url = cover;
        }
        if let Some(max) = lookup("SHELFSCAN_MAX_CANDIDATES").and_then(|v| v.parse().ok()) {
            config.max_candidates = max;
        }
        if let Some(library) = lookup("SHELFSCAN_DEFAULT_LIBRARY").filter(|l| !l.trim().is_empty()) {
            config.default_library = library;
        }
        if let Some(path) = lookup("SHELFSCAN_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("SHELFSCAN_REMOTE_URL") {
            config.remote_url = url;
        }
        if let Some(secs) = lookup("SHELFSCAN_HTTP_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.http_timeout_secs = secs;
        }

        config
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
