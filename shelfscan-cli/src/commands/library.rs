//! Library and book management commands

use super::open_store;
use anyhow::{Context, Result};
use shelfscan_core::{LocalBookStore, ScanConfig};

pub fn list_libraries(config: &ScanConfig) -> Result<()> {
    let store = open_store(config)?;
    let libraries = store.list_libraries()?;

    if libraries.is_empty() {
        println!("No libraries yet");
    }
    for library in &libraries {
        println!(
            "{:<30} {:>5} books  (created {})",
            library.name,
            library.book_count,
            library.created_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

pub fn create_library(config: &ScanConfig, name: &str) -> Result<()> {
    let store = open_store(config)?;
    let library = store
        .create_library(name)
        .with_context(|| format!("Failed to create library '{}'", name))?;
    println!("Created library '{}'", library.name);
    Ok(())
}

pub fn delete_library(config: &ScanConfig, name: &str) -> Result<()> {
    let store = open_store(config)?;
    let removed = store
        .delete_library(name)
        .with_context(|| format!("Failed to delete library '{}'", name))?;
    println!("Deleted library '{}' and {} books", name, removed);
    Ok(())
}

/// List books, optionally from one library
pub async fn books(config: &ScanConfig, library: Option<&str>, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let books = match library {
        Some(name) => store.books_in_library(name)?,
        None => store.list_books().await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }

    for book in &books {
        let mut flags = Vec::new();
        if book.is_read {
            flags.push("read");
        }
        if book.is_to_read {
            flags.push("to-read");
        }
        println!(
            "{}  {} by {}  [{}]{}",
            book.id,
            book.title,
            book.author,
            book.library_name,
            if flags.is_empty() {
                String::new()
            } else {
                format!(" ({})", flags.join(", "))
            }
        );
    }
    Ok(())
}

/// Set read and to-read flags on a book
pub fn mark(
    config: &ScanConfig,
    id: &str,
    is_read: Option<bool>,
    is_to_read: Option<bool>,
) -> Result<()> {
    let store = open_store(config)?;
    if let Some(is_read) = is_read {
        store.set_read(id, is_read)?;
    }
    if let Some(is_to_read) = is_to_read {
        store.set_to_read(id, is_to_read)?;
    }
    println!("Updated {}", id);
    Ok(())
}
