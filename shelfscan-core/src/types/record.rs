//! Persisted book records

use super::{CandidateBook, SeriesInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book accepted into a library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookRecord {
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

    /// Owning library, by name
    pub library_name: String,

    pub is_read: bool,
    pub is_to_read: bool,
    pub scanned_at: DateTime<Utc>,
}

impl BookRecord {
    /// Create a record with only the required fields set
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        library_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            series: None,
            cover_url: String::new(),
            genre: None,
            published_year: None,
            description: None,
            isbn: None,
            publisher: None,
            page_count: None,
            language: None,
            library_name: library_name.into(),
            is_read: false,
            is_to_read: false,
            scanned_at: Utc::now(),
        }
    }

    /// Convert an accepted candidate into a record owned by `library_name`
    pub fn from_candidate(candidate: &CandidateBook, library_name: impl Into<String>) -> Self {
        Self {
            id: candidate.id.to_string(),
            title: candidate.title.clone(),
            author: candidate.author.clone(),
            series: candidate.series.clone(),
            cover_url: candidate.cover_url.clone(),
            genre: candidate.genre.clone(),
            published_year: candidate.published_year,
            description: candidate.description.clone(),
            isbn: candidate.isbn.clone(),
            publisher: candidate.publisher.clone(),
            page_count: candidate.page_count,
            language: candidate.language.clone(),
            library_name: library_name.into(),
            is_read: false,
            is_to_read: false,
            scanned_at: Utc::now(),
        }
    }

    /// Key the local store keeps unique
    pub fn identity(&self) -> (String, String) {
        (self.title.to_lowercase(), self.author.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CandidateSource;

    #[test]
    fn test_from_candidate() {
        let mut candidate = CandidateBook::new(
            "Mistborn: The Well of Ascension",
            "Brandon Sanderson",
            "https://example.com/cover.jpg",
            0.9,
            CandidateSource::MetadataLookup,
        );
        candidate.series = Some(SeriesInfo::new("Mistborn", Some(2)));
        candidate.page_count = Some(590);

        let record = BookRecord::from_candidate(&candidate, "Fantasy Shelf");
        assert_eq!(record.id, candidate.id.to_string());
        assert_eq!(record.library_name, "Fantasy Shelf");
        assert_eq!(record.series, candidate.series);
        assert_eq!(record.page_count, Some(590));
        assert!(!record.is_read);
        assert!(!record.is_to_read);
    }

    #[test]
    fn test_identity_ignores_case() {
        let a = BookRecord::new("1", "Dune", "Frank Herbert", "Default Library");
        let b = BookRecord::new("2", "DUNE", "frank herbert", "Other");
        assert_eq!(a.identity(), b.identity());
    }
}
