//! Sync and upload commands

use super::{open_store, spinner};
use anyhow::{bail, Context, Result};
use shelfscan_core::remote::HttpProfileStore;
use shelfscan_core::{LibrarySync, ScanConfig, SyncReport};
use std::sync::Arc;

fn library_sync(config: &ScanConfig) -> Result<LibrarySync> {
    let store = open_store(config)?;
    let remote = HttpProfileStore::from_config(config).context("Failed to build HTTP client")?;
    Ok(LibrarySync::new(Arc::new(remote), Arc::new(store))
        .with_default_library(config.default_library.clone()))
}

fn finish(report: SyncReport) -> Result<()> {
    if !report.is_success() {
        bail!("{}", report.message);
    }
    println!("{}", report.message);
    Ok(())
}

/// Reconcile the local library with the user's account
pub async fn sync(config: &ScanConfig, user_id: &str) -> Result<()> {
    let sync = library_sync(config)?;

    let pb = spinner(format!("Syncing with {}...", config.remote_url));
    let report = sync.sync(user_id).await;
    pb.finish_and_clear();

    tracing::info!(books = report.books_merged, "Sync finished");
    finish(report)
}

/// Push the local library to the user's account
pub async fn upload(config: &ScanConfig, user_id: &str) -> Result<()> {
    let sync = library_sync(config)?;

    let pb = spinner(format!("Uploading to {}...", config.remote_url));
    let report = sync.upload_local(user_id).await;
    pb.finish_and_clear();

    finish(report)
}
