//! Core types shared by recognition, the stores and sync

mod candidate;
mod library;
mod record;
mod remote;
mod series;
mod volume;

pub use candidate::{CandidateBook, CandidateSource};
pub use library::Library;
pub use record::BookRecord;
pub use remote::{Profile, RemoteBook};
pub use series::SeriesInfo;
pub use volume::{ImageLinks, IndustryIdentifier, Volume};

/// Library name used when a book arrives without one
pub const DEFAULT_LIBRARY: &str = "Default Library";

/// Author used when a fragment names none
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
