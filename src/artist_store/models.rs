//! Data models for the artist mapping database.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors returned by artist mapping stores.
#[derive(Debug, Error)]
pub enum ArtistStoreError {
    /// Caller input rejected before any database access.
    #[error("{0}")]
    InvalidArgument(String),

    /// Connectivity or query failure. Any open transaction has already been
    /// rolled back when this is returned.
    #[error("{0}")]
    Storage(#[from] rusqlite::Error),
}

/// A platform an artist can have an external identifier on.
///
/// Tags are case-sensitive: only the lowercase forms returned by
/// [`Platform::as_str`] are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "spotify")]
    Spotify,
    #[serde(rename = "youtube")]
    Youtube,
    #[serde(rename = "am")]
    AppleMusic,
    #[serde(rename = "itunes")]
    Itunes,
    #[serde(rename = "genius")]
    Genius,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Spotify,
        Platform::Youtube,
        Platform::AppleMusic,
        Platform::Itunes,
        Platform::Genius,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Spotify => "spotify",
            Platform::Youtube => "youtube",
            Platform::AppleMusic => "am",
            Platform::Itunes => "itunes",
            Platform::Genius => "genius",
        }
    }

    /// Name of the `artists` column holding this platform's identifier.
    pub fn column(&self) -> &'static str {
        match self {
            Platform::Spotify => "spotify_id",
            Platform::Youtube => "youtube_id",
            Platform::AppleMusic => "am_id",
            Platform::Itunes => "itunes_id",
            Platform::Genius => "genius_id",
        }
    }

    /// Human readable list of accepted tags, e.g. `['spotify', 'youtube', ...]`.
    pub fn valid_tags() -> String {
        let tags = Platform::ALL
            .iter()
            .map(|p| format!("'{}'", p.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        format!("[{}]", tags)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ArtistStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                ArtistStoreError::InvalidArgument(format!(
                    "Invalid platform. Valid platforms are: {}",
                    Platform::valid_tags()
                ))
            })
    }
}

/// A row of the `artists` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistMapping {
    pub id: i64,
    pub name: String,
    pub spotify_id: Option<String>,
    pub youtube_id: Option<String>,
    pub am_id: Option<String>,
    pub itunes_id: Option<String>,
    pub genius_id: Option<String>,
}

impl ArtistMapping {
    pub fn platform_id(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Spotify => self.spotify_id.as_deref(),
            Platform::Youtube => self.youtube_id.as_deref(),
            Platform::AppleMusic => self.am_id.as_deref(),
            Platform::Itunes => self.itunes_id.as_deref(),
            Platform::Genius => self.genius_id.as_deref(),
        }
    }
}

/// Result of a successful upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created { name: String, platform: Platform },
    Updated { name: String, platform: Platform },
}

impl UpsertOutcome {
    pub fn message(&self) -> String {
        match self {
            UpsertOutcome::Created { name, platform } => {
                format!("Added new artist '{}' with {}", name, platform.column())
            }
            UpsertOutcome::Updated { name, platform } => {
                format!("Updated {} for artist '{}'", platform.column(), name)
            }
        }
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), ArtistStoreError> {
    if name.is_empty() {
        return Err(ArtistStoreError::InvalidArgument(
            "Artist name must not be empty".to_string(),
        ));
    }
    Ok(())
}
