//! Text extraction from shelf photos
//!
//! A [`TextExtractor`] turns an image into a handful of raw spine strings.
//! The recognition pipeline only depends on the trait, so a real OCR backend
//! can replace the simulated one without touching parsing or scoring.

mod sample;

pub use sample::{SampleTextExtractor, SAMPLE_SPINES};

use crate::error::ExtractionError;
use async_trait::async_trait;
use std::path::PathBuf;

/// Result type for extraction
pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;

/// A captured shelf photo
#[derive(Debug, Clone)]
pub enum ShelfImage {
    /// Image file on disk
    File(PathBuf),

    /// Encoded image bytes
    Bytes(Vec<u8>),
}

impl ShelfImage {
    /// Check that the image can be read, returning its size in bytes
    pub async fn ensure_available(&self) -> ExtractionResult<u64> {
        match self {
            ShelfImage::File(path) => {
                let metadata = tokio::fs::metadata(path).await.map_err(|e| {
                    ExtractionError::ImageUnavailable(format!("{}: {}", path.display(), e))
                })?;
                if !metadata.is_file() || metadata.len() == 0 {
                    return Err(ExtractionError::ImageUnavailable(format!(
                        "{}: not a non-empty file",
                        path.display()
                    )));
                }
                Ok(metadata.len())
            }
            ShelfImage::Bytes(bytes) if bytes.is_empty() => Err(
                ExtractionError::ImageUnavailable("empty image buffer".to_string()),
            ),
            ShelfImage::Bytes(bytes) => Ok(bytes.len() as u64),
        }
    }
}

/// Capability turning an image into raw text fragments
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract short free-text fragments, each plausibly "title [separator] author"
    async fn extract(&self, image: &ShelfImage) -> ExtractionResult<Vec<String>>;
}

/// Extractor returning a fixed set of fragments for any available image
#[derive(Debug, Clone, Default)]
pub struct FixedTextExtractor {
    fragments: Vec<String>,
}

impl FixedTextExtractor {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl TextExtractor for FixedTextExtractor {
    async fn extract(&self, image: &ShelfImage) -> ExtractionResult<Vec<String>> {
        image.ensure_available().await?;
        Ok(self.fragments.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let image = ShelfImage::File(PathBuf::from("/nonexistent/shelf.jpg"));
        let err = image.ensure_available().await.unwrap_err();
        assert!(matches!(err, ExtractionError::ImageUnavailable(_)));
    }

    #[tokio::test]
    async fn test_bytes_availability() {
        assert!(ShelfImage::Bytes(Vec::new()).ensure_available().await.is_err());
        assert_eq!(
            ShelfImage::Bytes(vec![0xFF, 0xD8]).ensure_available().await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_file_availability() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("shelf.jpg");
        tokio::fs::write(&path, b"jpeg").await.unwrap();

        let image = ShelfImage::File(path);
        assert_eq!(image.ensure_available().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_fixed_extractor() {
        let extractor = FixedTextExtractor::new(["Dune - Frank Herbert"]);
        let fragments = extractor
            .extract(&ShelfImage::Bytes(vec![1]))
            .await
            .unwrap();
        assert_eq!(fragments, vec!["Dune - Frank Herbert"]);
    }
}
