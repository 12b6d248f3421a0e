//! Scan command implementation

use super::{open_store, print_candidate, spinner};
use anyhow::{Context, Result};
use shelfscan_core::error::StoreError;
use shelfscan_core::extract::{FixedTextExtractor, SampleTextExtractor};
use shelfscan_core::metadata::GoogleBooksClient;
use shelfscan_core::{RecognitionPipeline, ScanConfig, ShelfImage, TextExtractor};
use std::path::Path;
use std::sync::Arc;

pub struct ScanOptions {
    pub fragments: Vec<String>,
    pub seed: Option<u64>,
    pub json: bool,
    /// Library to accept candidates into
    pub accept_into: Option<String>,
}

/// Recognize the books in a shelf photo
pub async fn scan(config: &ScanConfig, image: &Path, options: ScanOptions) -> Result<()> {
    let extractor: Arc<dyn TextExtractor> = if !options.fragments.is_empty() {
        Arc::new(FixedTextExtractor::new(options.fragments))
    } else if let Some(seed) = options.seed {
        Arc::new(SampleTextExtractor::with_seed(seed))
    } else {
        Arc::new(SampleTextExtractor::new())
    };
    let metadata = GoogleBooksClient::from_config(config).context("Failed to build metadata client")?;
    let pipeline = RecognitionPipeline::with_config(extractor, Arc::new(metadata), config);

    let pb = spinner(format!("Recognizing {}...", image.display()));
    let candidates = pipeline
        .recognize(&ShelfImage::File(image.to_path_buf()))
        .await;
    pb.finish_and_clear();
    let candidates = candidates.with_context(|| format!("Failed to scan {}", image.display()))?;

    tracing::info!("Recognized {} candidates", candidates.len());

    if options.json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
    } else if candidates.is_empty() {
        println!("No books recognized");
    } else {
        for (i, candidate) in candidates.iter().enumerate() {
            print_candidate(i, candidate);
        }
    }

    let Some(library) = options.accept_into else {
        return Ok(());
    };

    let store = open_store(config)?;
    let mut added = 0;
    for candidate in &candidates {
        match store.accept_candidate(candidate, &library) {
            Ok(_) => added += 1,
            Err(StoreError::Duplicate(what)) => {
                eprintln!("Skipped {} (already in your libraries)", what);
            }
            Err(e) => return Err(e).context("Failed to save book"),
        }
    }
    store.close()?;

    eprintln!("Added {} books to {}", added, library);
    Ok(())
}
