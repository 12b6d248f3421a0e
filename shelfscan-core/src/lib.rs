//! Shelfscan Core Library
//!
//! Recognition of books from photographed shelves, the local library store,
//! and the sync merge between that store and a user's remote profile.
//!
//! Recognition turns raw spine text into ranked [`CandidateBook`]s through a
//! pluggable [`TextExtractor`] and [`MetadataService`]. Accepted candidates
//! become [`BookRecord`]s in a [`LocalBookStore`], which [`LibrarySync`]
//! reconciles with a [`RemoteProfileStore`].

pub mod config;
pub mod error;
pub mod extract;
pub mod metadata;
pub mod recognition;
pub mod remote;
pub mod storage;
pub mod store;
pub mod sync;
pub mod types;

pub use config::ScanConfig;
pub use error::{RecognitionError, StoreError, SyncError};
pub use extract::{ShelfImage, TextExtractor};
pub use metadata::MetadataService;
pub use recognition::RecognitionPipeline;
pub use remote::RemoteProfileStore;
pub use store::{LocalBookStore, SqliteStore};
pub use sync::{LibrarySync, SyncReport, SyncStatus};
pub use types::{BookRecord, CandidateBook, CandidateSource, Library, Profile, RemoteBook, SeriesInfo};
