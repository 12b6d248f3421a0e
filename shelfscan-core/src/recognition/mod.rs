//! Recognition pipeline: shelf photo in, ranked candidate books out
//!
//! 1. extract raw spine text through a [`TextExtractor`]
//! 2. split each fragment into title and author ([`parse_fragment`])
//! 3. look the guess up in a [`MetadataService`]
//! 4. score how well the match explains the fragment ([`score_confidence`])
//! 5. detect series information ([`extract_series`])
//! 6. rank by confidence and keep the best few

mod enrich;
mod parse;
mod score;
mod series;

pub use enrich::{candidate_from_volume, genre_for_categories, select_cover_url, select_isbn};
pub use parse::{parse_fragment, FragmentPattern, ParsedFragment};
pub use score::{
    score_confidence, word_overlap, FALLBACK_CONFIDENCE, ISBN_MATCH_CONFIDENCE,
    MANUAL_MATCH_CONFIDENCE, OVERLAP_MATCH_CONFIDENCE, STRONG_MATCH_CONFIDENCE,
    WEAK_MATCH_CONFIDENCE,
};
pub use series::extract_series;

use crate::config::ScanConfig;
use crate::error::{MetadataError, RecognitionError};
use crate::extract::{ShelfImage, TextExtractor};
use crate::metadata::MetadataService;
use crate::types::{CandidateBook, CandidateSource, Volume, UNKNOWN_AUTHOR};
use futures::future::join_all;
use std::sync::Arc;

/// Results requested from a title/author search
const PRIMARY_RESULTS: usize = 5;

/// Results requested from the title-only retry
const TITLE_ONLY_RESULTS: usize = 3;

/// Result type for recognition
pub type RecognitionResult<T> = std::result::Result<T, RecognitionError>;

/// Turns shelf photos and manual queries into candidate books
#[derive(Clone)]
pub struct RecognitionPipeline {
    extractor: Arc<dyn TextExtractor>,
    metadata: Arc<dyn MetadataService>,
    placeholder_cover: String,
    max_candidates: usize,
}

impl RecognitionPipeline {
    pub fn new(extractor: Arc<dyn TextExtractor>, metadata: Arc<dyn MetadataService>) -> Self {
        Self::with_config(extractor, metadata, &ScanConfig::default())
    }

    pub fn with_config(
        extractor: Arc<dyn TextExtractor>,
        metadata: Arc<dyn MetadataService>,
        config: &ScanConfig,
    ) -> Self {
        Self {
            extractor,
            metadata,
            placeholder_cover: config.placeholder_cover_url.clone(),
            max_candidates: config.max_candidates,
        }
    }

    /// Recognize the books visible in a shelf photo
    ///
    /// Candidates are sorted by descending confidence, ties keeping fragment
    /// order, and truncated to the configured maximum. A failed lookup only
    /// degrades its own fragment; a failed extraction fails the whole call.
    pub async fn recognize(&self, image: &ShelfImage) -> RecognitionResult<Vec<CandidateBook>> {
        let fragments = self.extractor.extract(image).await?;
        tracing::debug!(count = fragments.len(), "Extracted fragments");

        let lookups = fragments
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(|fragment| self.identify_fragment(fragment));

        let candidates = join_all(lookups).await;
        Ok(rank_candidates(candidates, self.max_candidates))
    }

    async fn identify_fragment(&self, fragment: &str) -> CandidateBook {
        let parsed = parse_fragment(fragment);
        tracing::debug!(
            fragment,
            title = %parsed.title,
            author = %parsed.author,
            pattern = ?parsed.pattern,
            "Parsed fragment"
        );

        let author = parsed.has_author().then_some(parsed.author.as_str());
        let best = match self.best_match(&parsed.title, author).await {
            Ok(best) => best,
            Err(e) => {
                tracing::warn!("Metadata lookup failed for {:?}: {}", fragment, e);
                None
            }
        };

        let confidence = score_confidence(fragment, best.as_ref().map(|v| v.title.as_str()));
        match best {
            Some(volume) => {
                candidate_from_volume(&volume, &parsed.author, &self.placeholder_cover, confidence)
            }
            None => CandidateBook::new(
                parsed.title,
                parsed.author,
                self.placeholder_cover.clone(),
                confidence,
                CandidateSource::Fallback,
            ),
        }
    }

    /// Title+author search, then a title-only retry when that finds nothing
    async fn best_match(
        &self,
        title: &str,
        author: Option<&str>,
    ) -> Result<Option<Volume>, MetadataError> {
        let volumes = self
            .metadata
            .search_by_title_author(title, author, PRIMARY_RESULTS)
            .await?;
        if let Some(volume) = volumes.into_iter().next() {
            return Ok(Some(volume));
        }

        if author.is_none() {
            return Ok(None);
        }

        let volumes = self
            .metadata
            .search_by_title_author(title, None, TITLE_ONLY_RESULTS)
            .await?;
        Ok(volumes.into_iter().next())
    }

    /// Look up a single title (and optional author) typed by the user
    ///
    /// Same search as a scanned fragment, including the title-only retry.
    /// A miss is `Ok(None)`; there is no low-confidence guess.
    pub async fn lookup_by_title_author(
        &self,
        title: &str,
        author: Option<&str>,
    ) -> RecognitionResult<Option<CandidateBook>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }
        let author = author
            .map(str::trim)
            .filter(|a| !a.is_empty() && *a != UNKNOWN_AUTHOR);

        let best = self
            .best_match(title, author)
            .await
            .map_err(|e| RecognitionError::LookupFailed(e.to_string()))?;

        Ok(best.map(|volume| {
            candidate_from_volume(
                &volume,
                author.unwrap_or(UNKNOWN_AUTHOR),
                &self.placeholder_cover,
                MANUAL_MATCH_CONFIDENCE,
            )
        }))
    }

    /// Look up a book by ISBN-10 or ISBN-13
    pub async fn lookup_by_isbn(&self, isbn: &str) -> RecognitionResult<Option<CandidateBook>> {
        let isbn = normalize_isbn(isbn);
        if isbn.is_empty() {
            return Ok(None);
        }

        let volumes = self
            .metadata
            .search_by_isbn(&isbn)
            .await
            .map_err(|e| RecognitionError::LookupFailed(e.to_string()))?;

        Ok(volumes.first().map(|volume| {
            let mut candidate = candidate_from_volume(
                volume,
                UNKNOWN_AUTHOR,
                &self.placeholder_cover,
                ISBN_MATCH_CONFIDENCE,
            );
            if candidate.isbn.is_none() {
                candidate.isbn = Some(isbn.clone());
            }
            candidate
        }))
    }
}

/// Strip hyphens and whitespace from a typed ISBN
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Stable sort by descending confidence, then truncate
pub fn rank_candidates(mut candidates: Vec<CandidateBook>, max: usize) -> Vec<CandidateBook> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    candidates.truncate(max);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::FixedTextExtractor;
    use crate::metadata::MetadataResult;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Metadata service answering from a title-keyed table
    #[derive(Default)]
    struct StaticMetadata {
        by_title: HashMap<String, Volume>,
        by_isbn: HashMap<String, Volume>,
        failing_titles: Vec<String>,
        calls: Mutex<Vec<(String, Option<String>, usize)>>,
    }

    impl StaticMetadata {
        fn with_volume(mut self, key: &str, volume: Volume) -> Self {
            self.by_title.insert(key.to_lowercase(), volume);
            self
        }

        fn with_isbn(mut self, isbn: &str, volume: Volume) -> Self {
            self.by_isbn.insert(isbn.to_string(), volume);
            self
        }

        fn failing(mut self, title: &str) -> Self {
            self.failing_titles.push(title.to_string());
            self
        }
    }

    #[async_trait]
    impl MetadataService for StaticMetadata {
        async fn search_by_title_author(
            &self,
            title: &str,
            author: Option<&str>,
            max_results: usize,
        ) -> MetadataResult<Vec<Volume>> {
            self.calls.lock().unwrap().push((
                title.to_string(),
                author.map(str::to_string),
                max_results,
            ));
            if self.failing_titles.iter().any(|t| t == title) {
                return Err(MetadataError::Http("connection reset".to_string()));
            }
            // Only title-only searches find volumes registered under "title-only:"
            let key = match author {
                Some(_) => title.to_lowercase(),
                None => format!("title-only:{}", title.to_lowercase()),
            };
            Ok(self
                .by_title
                .get(&key)
                .or_else(|| self.by_title.get(&title.to_lowercase()))
                .cloned()
                .into_iter()
                .collect())
        }

        async fn search_by_isbn(&self, isbn: &str) -> MetadataResult<Vec<Volume>> {
            Ok(self.by_isbn.get(isbn).cloned().into_iter().collect())
        }
    }

    struct FailingExtractor;

    #[async_trait]
    impl TextExtractor for FailingExtractor {
        async fn extract(&self, _image: &ShelfImage) -> crate::extract::ExtractionResult<Vec<String>> {
            Err(crate::error::ExtractionError::Backend("camera offline".to_string()))
        }
    }

    fn image() -> ShelfImage {
        ShelfImage::Bytes(vec![0xFF])
    }

    fn pipeline(fragments: &[&str], metadata: StaticMetadata) -> RecognitionPipeline {
        RecognitionPipeline::new(
            Arc::new(FixedTextExtractor::new(fragments.iter().copied())),
            Arc::new(metadata),
        )
    }

    #[tokio::test]
    async fn test_recognize_ranks_by_confidence() {
        let metadata = StaticMetadata::default()
            .with_volume("The Hobbit", Volume::new("The Hobbit").with_author("J.R.R. Tolkien"))
            .with_volume("The Road", Volume::new("On the Road").with_author("Jack Kerouac"));

        let candidates = pipeline(
            &["Unknown Tome - Nobody", "The Road - Cormac McCarthy", "The Hobbit - J.R.R. Tolkien"],
            metadata,
        )
        .recognize(&image())
        .await
        .unwrap();

        let scores: Vec<f32> = candidates.iter().map(|c| c.confidence).collect();
        assert_eq!(scores, vec![0.9, 0.5, 0.3]);
        assert_eq!(candidates[0].title, "The Hobbit");
        assert_eq!(candidates[0].source, CandidateSource::MetadataLookup);
        assert_eq!(candidates[1].title, "On the Road");
        assert_eq!(candidates[2].title, "Unknown Tome");
        assert_eq!(candidates[2].author, "Nobody");
        assert_eq!(candidates[2].source, CandidateSource::Fallback);
        assert_eq!(candidates[2].cover_url, ScanConfig::default().placeholder_cover_url);
    }

    #[tokio::test]
    async fn test_recognize_truncates_and_keeps_tie_order() {
        let fragments = ["A - X", "B - X", "C - X", "D - X", "E - X", "F - X", "G - X"];
        let candidates = pipeline(&fragments, StaticMetadata::default())
            .recognize(&image())
            .await
            .unwrap();

        let titles: Vec<&str> = candidates.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C", "D", "E"]);
        assert!(candidates.iter().all(|c| c.confidence == FALLBACK_CONFIDENCE));
    }

    #[tokio::test]
    async fn test_lookup_failure_degrades_single_fragment() {
        let metadata = StaticMetadata::default()
            .with_volume("Dune", Volume::new("Dune").with_author("Frank Herbert"))
            .failing("Emma");

        let candidates = pipeline(&["Emma - Jane Austen", "Dune - Frank Herbert"], metadata)
            .recognize(&image())
            .await
            .unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "Dune");
        assert_eq!(candidates[0].confidence, 0.9);
        assert_eq!(candidates[1].title, "Emma");
        assert_eq!(candidates[1].confidence, 0.3);
        assert_eq!(candidates[1].source, CandidateSource::Fallback);
    }

    #[tokio::test]
    async fn test_title_only_retry() {
        let metadata = StaticMetadata::default().with_volume(
            "title-only:the name of the wind",
            Volume::new("The Name of the Wind").with_author("Patrick Rothfuss"),
        );
        let metadata = Arc::new(metadata);
        let pipeline = RecognitionPipeline::new(
            Arc::new(FixedTextExtractor::new(["The Name of the Wind by Pat Rothfus"])),
            metadata.clone(),
        );

        let candidates = pipeline.recognize(&image()).await.unwrap();
        assert_eq!(candidates[0].author, "Patrick Rothfuss");
        assert_eq!(candidates[0].confidence, 0.9);

        let calls = metadata.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1.as_deref(), Some("Pat Rothfus"));
        assert_eq!(calls[1], ("The Name of the Wind".to_string(), None, 3));
    }

    #[tokio::test]
    async fn test_unknown_author_is_not_sent() {
        let metadata = Arc::new(StaticMetadata::default());
        let pipeline = RecognitionPipeline::new(
            Arc::new(FixedTextExtractor::new(["Neuromancer", "   "])),
            metadata.clone(),
        );

        let candidates = pipeline.recognize(&image()).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].author, "Unknown Author");

        let calls = metadata.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, None);
    }

    #[tokio::test]
    async fn test_extraction_failure_is_recognition_failed() {
        let pipeline = RecognitionPipeline::new(
            Arc::new(FailingExtractor),
            Arc::new(StaticMetadata::default()),
        );
        let err = pipeline.recognize(&image()).await.unwrap_err();
        assert!(matches!(err, RecognitionError::RecognitionFailed(_)));
    }

    #[tokio::test]
    async fn test_manual_title_lookup() {
        let metadata = StaticMetadata::default()
            .with_volume("Mistborn", Volume::new("Mistborn #1").with_author("Brandon Sanderson"));
        let pipeline = pipeline(&[], metadata);

        let candidate = pipeline
            .lookup_by_title_author("Mistborn", Some("Sanderson"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(candidate.confidence, 0.9);
        assert_eq!(candidate.series.unwrap().number, Some(1));

        let miss = pipeline.lookup_by_title_author("Nonexistent", None).await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_manual_lookup_retries_title_only() {
        let metadata = Arc::new(StaticMetadata::default().with_volume(
            "title-only:the name of the wind",
            Volume::new("The Name of the Wind").with_author("Patrick Rothfuss"),
        ));
        let pipeline = RecognitionPipeline::new(
            Arc::new(FixedTextExtractor::new(Vec::<String>::new())),
            metadata.clone(),
        );

        let candidate = pipeline
            .lookup_by_title_author("The Name of the Wind", Some("Pat Rothfus"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(candidate.author, "Patrick Rothfuss");
        assert_eq!(candidate.confidence, MANUAL_MATCH_CONFIDENCE);

        let calls = metadata.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1.as_deref(), Some("Pat Rothfus"));
        assert_eq!(calls[1], ("The Name of the Wind".to_string(), None, 3));
    }

    #[tokio::test]
    async fn test_manual_lookup_failure_is_an_error() {
        let pipeline = pipeline(&[], StaticMetadata::default().failing("Emma"));
        let err = pipeline.lookup_by_title_author("Emma", None).await.unwrap_err();
        assert!(matches!(err, RecognitionError::LookupFailed(_)));
    }

    #[tokio::test]
    async fn test_isbn_lookup() {
        let metadata = StaticMetadata::default().with_isbn(
            "9780261103344",
            Volume::new("The Hobbit").with_author("J.R.R. Tolkien"),
        );
        let pipeline = pipeline(&[], metadata);

        let candidate = pipeline
            .lookup_by_isbn("978-0-261-10334-4")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(candidate.confidence, 0.95);
        assert_eq!(candidate.isbn.as_deref(), Some("9780261103344"));
        assert_eq!(candidate.source, CandidateSource::MetadataLookup);

        assert!(pipeline.lookup_by_isbn("0000000000").await.unwrap().is_none());
        assert!(pipeline.lookup_by_isbn(" - ").await.unwrap().is_none());
    }

    #[test]
    fn test_normalize_isbn() {
        assert_eq!(normalize_isbn("0-306-40615-x"), "030640615X");
        assert_eq!(normalize_isbn(" 978 0 306 40615 7 "), "9780306406157");
    }

    #[test]
    fn test_rank_is_stable() {
        let make = |title: &str, confidence: f32| {
            CandidateBook::new(title, "A", "", confidence, CandidateSource::Fallback)
        };
        let ranked = rank_candidates(
            vec![make("a", 0.5), make("b", 0.9), make("c", 0.5), make("d", 0.9)],
            3,
        );
        let titles: Vec<&str> = ranked.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "d", "a"]);
    }
}
