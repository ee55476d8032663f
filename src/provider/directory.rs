//! ArtistDirectory trait definition.

use super::models::{ArtistDetail, ArtistSearch};
use async_trait::async_trait;
use thiserror::Error;

/// Number of results returned by a search when the caller doesn't ask otherwise.
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;

/// Largest page the provider accepts for a search.
pub const MAX_SEARCH_LIMIT: u32 = 50;

/// Errors that can occur when talking to the metadata provider.
///
/// An artist that doesn't exist is not an error, see [`ArtistDirectory::get_artist`].
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::Connection(err.to_string())
        }
    }
}

/// Read-only access to an external artist catalog.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait ArtistDirectory: Send + Sync {
    /// Get the details of an artist by its provider id.
    ///
    /// Returns `Ok(None)` when the provider reports that the artist doesn't exist.
    async fn get_artist(&self, artist_id: &str) -> Result<Option<ArtistDetail>, ProviderError>;

    /// Search artists by name, returning at most `limit` results in the
    /// provider's order. `limit` must be within `1..=MAX_SEARCH_LIMIT`.
    async fn search_artist(&self, name: &str, limit: u32) -> Result<ArtistSearch, ProviderError>;
}
