//! Aritmetica Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod artist_store;
pub mod config;
pub mod provider;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use artist_store::{ArtistMappingStore, Platform, SqliteArtistStore};
pub use provider::{ArtistDirectory, SpotifyClient, SpotifyConfig};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
