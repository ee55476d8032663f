//! Lookups against the external music-metadata provider.
//!
//! - `directory`: the provider-agnostic [`ArtistDirectory`] trait and its errors
//! - `spotify`: Spotify Web API implementation

mod directory;
mod models;
mod spotify;

#[cfg(feature = "mock")]
pub use directory::MockArtistDirectory;
pub use directory::{ArtistDirectory, ProviderError, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
pub use models::{ArtistDetail, ArtistImage, ArtistSearch, ArtistSummary, MAX_POPULARITY};
pub use spotify::{SpotifyClient, SpotifyConfig, SPOTIFY_API_BASE, SPOTIFY_AUTH_URL};
