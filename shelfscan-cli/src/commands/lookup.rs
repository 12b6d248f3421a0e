//! Lookup command implementation

use super::{print_candidate, spinner};
use anyhow::{Context, Result};
use shelfscan_core::extract::FixedTextExtractor;
use shelfscan_core::metadata::GoogleBooksClient;
use shelfscan_core::{RecognitionPipeline, ScanConfig};
use std::sync::Arc;

pub enum LookupQuery {
    TitleAuthor {
        title: String,
        author: Option<String>,
    },
    Isbn(String),
}

/// Look up a single book; a miss is reported, not an error
pub async fn lookup(config: &ScanConfig, query: LookupQuery, json: bool) -> Result<()> {
    let metadata = GoogleBooksClient::from_config(config).context("Failed to build metadata client")?;
    let pipeline = RecognitionPipeline::with_config(
        Arc::new(FixedTextExtractor::default()),
        Arc::new(metadata),
        config,
    );

    let pb = spinner("Looking up...");
    let found = match &query {
        LookupQuery::TitleAuthor { title, author } => {
            pipeline
                .lookup_by_title_author(title, author.as_deref())
                .await
        }
        LookupQuery::Isbn(isbn) => pipeline.lookup_by_isbn(isbn).await,
    };
    pb.finish_and_clear();

    match found? {
        Some(candidate) if json => println!("{}", serde_json::to_string_pretty(&candidate)?),
        Some(candidate) => print_candidate(0, &candidate),
        None if json => println!("null"),
        None => println!("No match found"),
    }
    Ok(())
}
