//! Book metadata services

mod google_books;

pub use google_books::GoogleBooksClient;

use crate::error::MetadataError;
use crate::types::Volume;
use async_trait::async_trait;

/// Result type for metadata lookups
pub type MetadataResult<T> = std::result::Result<T, MetadataError>;

/// Service mapping title/author/ISBN queries to bibliographic records
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Search by title, optionally narrowed by author, best match first
    async fn search_by_title_author(
        &self,
        title: &str,
        author: Option<&str>,
        max_results: usize,
    ) -> MetadataResult<Vec<Volume>>;

    /// Search by ISBN; zero or one result is expected
    async fn search_by_isbn(&self, isbn: &str) -> MetadataResult<Vec<Volume>>;
}
