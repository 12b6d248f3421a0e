//! User-defined libraries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named collection of book records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Library {
    /// Unique name
    pub name: String,

    pub created_at: DateTime<Utc>,

    /// Derived from the records referencing this library, never stored
    pub book_count: usize,
}
