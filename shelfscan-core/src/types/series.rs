//! Series information

use serde::{Deserialize, Serialize};

/// Series information for books that are part of a series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeriesInfo {
    /// Series name
    pub name: String,

    /// Position in series, when the title states one
    pub number: Option<u32>,
}

impl SeriesInfo {
    pub fn new(name: impl Into<String>, number: Option<u32>) -> Self {
        Self {
            name: name.into(),
            number,
        }
    }
}
