//! Remote (per-user profile) shapes of a book collection

use super::{BookRecord, SeriesInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's remote profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub user_id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub books: Vec<RemoteBook>,
}

impl Profile {
    /// Empty profile for a user the remote has never seen
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }
}

/// A book as stored in a remote profile
///
/// Older clients wrote books without a library or scan time, so those
/// fields are optional here and filled in on conversion to a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteBook {
    pub id: String,
    pub title: String,
    pub author: String,
    pub series: Option<SeriesInfo>,
    pub cover_url: String,
    pub genre: Option<String>,
    pub published_year: Option<i32>,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub page_count: Option<u32>,
    pub language: Option<String>,
    pub library_name: Option<String>,
    pub is_read: bool,
    pub is_to_read: bool,
    pub scanned_at: Option<DateTime<Utc>>,
}

impl RemoteBook {
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    /// Convert to the local record shape
    pub fn to_record(&self, default_library: &str) -> BookRecord {
        BookRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            series: self.series.clone(),
            cover_url: self.cover_url.clone(),
            genre: self.genre.clone(),
            published_year: self.published_year,
            description: self.description.clone(),
            isbn: self.isbn.clone(),
            publisher: self.publisher.clone(),
            page_count: self.page_count,
            language: self.language.clone(),
            library_name: self
                .library_name
                .clone()
                .unwrap_or_else(|| default_library.to_string()),
            is_read: self.is_read,
            is_to_read: self.is_to_read,
            scanned_at: self.scanned_at.unwrap_or_else(Utc::now),
        }
    }

    /// Whether a local record already holds this book's content
    ///
    /// Fields the remote leaves unset are not compared.
    pub fn matches_record(&self, record: &BookRecord, default_library: &str) -> bool {
        let library = self.library_name.as_deref().unwrap_or(default_library);
        self.id == record.id
            && self.title == record.title
            && self.author == record.author
            && self.series == record.series
            && self.cover_url == record.cover_url
            && self.genre == record.genre
            && self.published_year == record.published_year
            && self.description == record.description
            && self.isbn == record.isbn
            && self.publisher == record.publisher
            && self.page_count == record.page_count
            && self.language == record.language
            && library == record.library_name
            && self.is_read == record.is_read
            && self.is_to_read == record.is_to_read
            && self.scanned_at.map_or(true, |at| at == record.scanned_at)
    }
}

impl From<&BookRecord> for RemoteBook {
    fn from(record: &BookRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            author: record.author.clone(),
            series: record.series.clone(),
            cover_url: record.cover_url.clone(),
            genre: record.genre.clone(),
            published_year: record.published_year,
            description: record.description.clone(),
            isbn: record.isbn.clone(),
            publisher: record.publisher.clone(),
            page_count: record.page_count,
            language: record.language.clone(),
            library_name: Some(record.library_name.clone()),
            is_read: record.is_read,
            is_to_read: record.is_to_read,
            scanned_at: Some(record.scanned_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_LIBRARY;

    #[test]
    fn test_missing_library_defaults() {
        let remote: RemoteBook =
            serde_json::from_str(r#"{"id": "1", "title": "Dune", "author": "Frank Herbert"}"#)
                .unwrap();
        let record = remote.to_record(DEFAULT_LIBRARY);

        assert_eq!(record.library_name, "Default Library");
        assert!(!record.is_read);
        assert!(remote.matches_record(&record, DEFAULT_LIBRARY));
    }

    #[test]
    fn test_record_roundtrip_matches() {
        let mut record = BookRecord::new("7", "Emma", "Jane Austen", "Classics");
        record.is_read = true;

        let remote = RemoteBook::from(&record);
        assert_eq!(remote.library_name.as_deref(), Some("Classics"));
        assert!(remote.matches_record(&record, DEFAULT_LIBRARY));

        record.is_to_read = true;
        assert!(!remote.matches_record(&record, DEFAULT_LIBRARY));
    }

    #[test]
    fn test_unknown_profile_fields_default() {
        let profile: Profile = serde_json::from_str(r#"{"user_id": "reader-1"}"#).unwrap();
        assert_eq!(profile, Profile::empty("reader-1"));
    }
}
