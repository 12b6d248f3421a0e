//! Integration tests for the Shelfscan CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Nothing listens here, so every HTTP call fails fast
const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Command with an isolated database and no network dependencies
fn shelfscan(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shelfscan").unwrap();
    cmd.env("SHELFSCAN_DB_PATH", dir.path().join("shelf.db"))
        .env("SHELFSCAN_METADATA_URL", UNREACHABLE)
        .env("SHELFSCAN_REMOTE_URL", UNREACHABLE)
        .env("SHELFSCAN_HTTP_TIMEOUT_SECS", "2");
    cmd
}

/// Write a stand-in shelf photo
fn create_test_photo(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("shelf.jpg");
    fs::write(&path, b"\xFF\xD8\xFF\xE0 not really a jpeg").expect("Failed to write test photo");
    path
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("shelfscan").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("lookup"))
        .stdout(predicate::str::contains("libraries"))
        .stdout(predicate::str::contains("sync"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("shelfscan").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shelfscan"));
}

#[test]
fn test_scan_help() {
    let mut cmd = Command::cargo_bin("shelfscan").unwrap();
    cmd.args(["scan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recognize the books"))
        .stdout(predicate::str::contains("--fragment"))
        .stdout(predicate::str::contains("--accept"));
}

#[test]
fn test_create_and_list_libraries() {
    let dir = TempDir::new().unwrap();

    shelfscan(&dir)
        .args(["libraries", "create", "Living Room"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created library 'Living Room'"));

    shelfscan(&dir)
        .args(["libraries", "create", "living room"])
        .assert()
        .failure();

    shelfscan(&dir)
        .arg("libraries")
        .assert()
        .success()
        .stdout(predicate::str::contains("Living Room"))
        .stdout(predicate::str::contains("0 books"));
}

#[test]
fn test_db_flag_overrides_environment() {
    let dir = TempDir::new().unwrap();
    let other = dir.path().join("other.db");

    shelfscan(&dir)
        .arg("--db")
        .arg(&other)
        .args(["libraries", "create", "Attic"])
        .assert()
        .success();

    assert!(other.exists());
    assert!(!dir.path().join("shelf.db").exists());
}

#[test]
fn test_scan_missing_photo() {
    let dir = TempDir::new().unwrap();

    shelfscan(&dir)
        .args(["scan", "/nonexistent/shelf.jpg", "--fragment", "Dune - Frank Herbert"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to scan"));
}

#[test]
fn test_scan_offline_falls_back_and_accepts() {
    let dir = TempDir::new().unwrap();
    let photo = create_test_photo(&dir);

    let output = shelfscan(&dir)
        .arg("scan")
        .arg(&photo)
        .args([
            "--fragment",
            "Dune - Frank Herbert",
            "--fragment",
            "Emma by Jane Austen",
            "--json",
            "--accept",
            "--library",
            "Classics",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let candidates: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let candidates = candidates.as_array().unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0]["title"], "Dune");
    assert_eq!(candidates[0]["source"], "fallback");
    assert_eq!(candidates[1]["author"], "Jane Austen");

    let output = shelfscan(&dir)
        .args(["books", "--library", "Classics", "--json"])
        .output()
        .unwrap();
    let books: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(books.as_array().unwrap().len(), 2);

    // Accepting the same scan again adds nothing
    shelfscan(&dir)
        .arg("scan")
        .arg(&photo)
        .args(["--fragment", "Dune - Frank Herbert", "--accept"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Added 0 books"));
}

#[test]
fn test_mark_requires_a_status() {
    let dir = TempDir::new().unwrap();

    shelfscan(&dir).args(["mark", "some-id"]).assert().failure();

    shelfscan(&dir)
        .args(["mark", "missing-id", "--read"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_lookup_requires_a_query() {
    let dir = TempDir::new().unwrap();

    shelfscan(&dir).arg("lookup").assert().failure();
    shelfscan(&dir)
        .args(["lookup", "--title", "Dune", "--isbn", "9780441013593"])
        .assert()
        .failure();
}

#[test]
fn test_lookup_unreachable_service_fails() {
    let dir = TempDir::new().unwrap();

    shelfscan(&dir)
        .args(["lookup", "--isbn", "978-0-441-01359-3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Lookup failed"));
}

#[test]
fn test_sync_unreachable_remote_fails() {
    let dir = TempDir::new().unwrap();

    shelfscan(&dir)
        .args(["sync", "--user", "reader"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Sync failed"));
}

#[test]
fn test_upload_empty_library_is_noop() {
    let dir = TempDir::new().unwrap();

    shelfscan(&dir)
        .args(["upload", "--user", "reader"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No local books to upload"));
}
