//! Candidate books produced by recognition

use super::SeriesInfo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a candidate's identity came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Confirmed against the metadata service
    MetadataLookup,

    /// Raw heuristic guess from the extracted text
    Fallback,
}

/// An unpersisted, scored guess about a book's identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateBook {
    /// Unique per recognition run
    pub id: Uuid,

    pub title: String,
    pub author: String,

    /// Series information, when the title or description names one
    pub series: Option<SeriesInfo>,

    /// Cover image, or the configured placeholder
    pub cover_url: String,

    pub genre: Option<String>,
    pub published_year: Option<i32>,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub page_count: Option<u32>,
    pub language: Option<String>,

    /// Trust score in [0, 1]
    pub confidence: f32,

    pub source: CandidateSource,
}

impl CandidateBook {
    /// Create a candidate with only the required fields set
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        cover_url: impl Into<String>,
        confidence: f32,
        source: CandidateSource,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author: author.into(),
            series: None,
            cover_url: cover_url.into(),
            genre: None,
            published_year: None,
            description: None,
            isbn: None,
            publisher: None,
            page_count: None,
            language: None,
            confidence: confidence.clamp(0.0, 1.0),
            source,
        }
    }

    /// Whether the candidate was confirmed by the metadata service
    pub fn is_confirmed(&self) -> bool {
        self.source == CandidateSource::MetadataLookup
    }
}
