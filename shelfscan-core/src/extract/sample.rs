//! Simulated OCR drawing spine text from a fixed pool

use super::{ExtractionResult, ShelfImage, TextExtractor};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Spine strings the simulated extractor draws from
pub const SAMPLE_SPINES: &[&str] = &[
    "The Great Gatsby - F. Scott Fitzgerald",
    "To Kill a Mockingbird by Harper Lee",
    "1984 - George Orwell",
    "Pride and Prejudice by Jane Austen",
    "The Catcher in the Rye – J.D. Salinger",
    "The Hobbit - J.R.R. Tolkien",
    "Mistborn #2 by Brandon Sanderson",
    "Dune Herbert",
    "Brave New World - Aldous Huxley",
    "The Name of the Wind by Patrick Rothfuss",
    "Beloved – Toni Morrison",
    "Sapiens - Yuval Noah Harari",
    "Moby Dick by Herman Melville",
    "Neuromancer",
];

const MIN_FRAGMENTS: usize = 2;
const MAX_FRAGMENTS: usize = 4;

/// Stand-in for a vision service
///
/// Each call returns 2 to 4 distinct strings from [`SAMPLE_SPINES`]. The
/// image is only checked for availability.
pub struct SampleTextExtractor {
    rng: Mutex<StdRng>,
}

impl SampleTextExtractor {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible draws for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn draw(&self) -> Vec<String> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let count = rng.gen_range(MIN_FRAGMENTS..=MAX_FRAGMENTS);
        SAMPLE_SPINES
            .choose_multiple(&mut *rng, count)
            .map(|s| s.to_string())
            .collect()
    }
}

impl Default for SampleTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for SampleTextExtractor {
    async fn extract(&self, image: &ShelfImage) -> ExtractionResult<Vec<String>> {
        let size = image.ensure_available().await?;
        let fragments = self.draw();
        tracing::debug!(size, count = fragments.len(), "Simulated text extraction");
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_draws_two_to_four_distinct_fragments() {
        let extractor = SampleTextExtractor::with_seed(7);
        let image = ShelfImage::Bytes(vec![1, 2, 3]);

        for _ in 0..50 {
            let fragments = extractor.extract(&image).await.unwrap();
            assert!((2..=4).contains(&fragments.len()));

            let unique: HashSet<_> = fragments.iter().collect();
            assert_eq!(unique.len(), fragments.len());
            assert!(fragments.iter().all(|f| SAMPLE_SPINES.contains(&f.as_str())));
        }
    }

    #[tokio::test]
    async fn test_seed_is_reproducible() {
        let image = ShelfImage::Bytes(vec![1]);
        let a = SampleTextExtractor::with_seed(42).extract(&image).await.unwrap();
        let b = SampleTextExtractor::with_seed(42).extract(&image).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_unavailable_image_fails() {
        let extractor = SampleTextExtractor::new();
        assert!(extractor.extract(&ShelfImage::Bytes(Vec::new())).await.is_err());
    }
}
