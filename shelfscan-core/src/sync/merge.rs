//! Pure merge rules between a remote book list and the local collection

use crate::types::{BookRecord, RemoteBook};
use std::collections::{HashMap, HashSet};

/// Remote list followed by every local book whose id the remote lacks
///
/// Remote copies win on id collisions. Returns the merged list and how many
/// local books were appended.
pub fn merge_books(remote: &[RemoteBook], local: &[BookRecord]) -> (Vec<RemoteBook>, usize) {
    let remote_ids: HashSet<&str> = remote.iter().map(|b| b.id.as_str()).collect();

    let mut merged = remote.to_vec();
    let before = merged.len();
    merged.extend(
        local
            .iter()
            .filter(|record| !remote_ids.contains(record.id.as_str()))
            .map(RemoteBook::from),
    );
    let appended = merged.len() - before;
    (merged, appended)
}

/// Whether the local collection already holds the merged list
///
/// A merged book counts as present when a local record with its id matches
/// it field for field, or when its (title, author) is already taken by
/// another local record and so could never be inserted.
pub fn local_is_converged(
    merged: &[RemoteBook],
    local: &[BookRecord],
    default_library: &str,
) -> bool {
    let by_id: HashMap<&str, &BookRecord> = local.iter().map(|r| (r.id.as_str(), r)).collect();
    let identities: HashSet<(String, String)> = local.iter().map(BookRecord::identity).collect();

    let merged_ids: HashSet<&str> = merged.iter().map(|b| b.id.as_str()).collect();
    if local.iter().any(|r| !merged_ids.contains(r.id.as_str())) {
        return false;
    }

    merged.iter().all(|book| match by_id.get(book.id.as_str()) {
        Some(record) => book.matches_record(record, default_library),
        None => identities.contains(&(book.title.to_lowercase(), book.author.to_lowercase())),
    })
}
