//! CLI command implementations

mod library;
mod lookup;
mod scan;
mod sync;

pub use library::{books, create_library, delete_library, list_libraries, mark};
pub use lookup::{lookup, LookupQuery};
pub use scan::{scan, ScanOptions};
pub use sync::{sync, upload};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use shelfscan_core::{CandidateBook, ScanConfig, SqliteStore};
use std::time::Duration;

/// Animated spinner on stderr
fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("static template"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.into());
    pb
}

fn open_store(config: &ScanConfig) -> Result<SqliteStore> {
    SqliteStore::open(&config.db_path)
        .with_context(|| format!("Failed to open library database {}", config.db_path.display()))
}

fn print_candidate(index: usize, candidate: &CandidateBook) {
    println!(
        "{:>2}. {} by {}  [{:.2}, {}]",
        index + 1,
        candidate.title,
        candidate.author,
        candidate.confidence,
        match candidate.source {
            shelfscan_core::CandidateSource::MetadataLookup => "matched",
            shelfscan_core::CandidateSource::Fallback => "guess",
        }
    );
    if let Some(series) = &candidate.series {
        match series.number {
            Some(n) => println!("    Series:  {} #{}", series.name, n),
            None => println!("    Series:  {}", series.name),
        }
    }
    if let Some(isbn) = &candidate.isbn {
        println!("    ISBN:    {}", isbn);
    }
    if let Some(genre) = &candidate.genre {
        println!("    Genre:   {}", genre);
    }
}
