//! Persistent mapping from artist names to their identifiers on each
//! supported platform.

mod connection;
mod models;
mod schema;
mod store;
mod trait_def;

pub use connection::{ConnectionSource, SqliteFileSource, DEFAULT_BUSY_TIMEOUT};
pub use models::{ArtistMapping, ArtistStoreError, Platform, UpsertOutcome};
pub use store::SqliteArtistStore;
pub use trait_def::ArtistMappingStore;
