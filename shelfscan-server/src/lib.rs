//! Shelfscan Server Library
//!
//! Profile server holding each user's synced book list. Exported for
//! testing and embedding.

pub mod handlers;
pub mod routes;
pub mod state;
