//! Normalized artist records and the provider payloads they are built from.

use super::directory::ProviderError;
use serde::{Deserialize, Serialize};

/// Highest popularity score the provider assigns.
pub const MAX_POPULARITY: u8 = 100;

// =============================================================================
// Normalized records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistImage {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Full artist record returned by a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistDetail {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    /// 0 to [`MAX_POPULARITY`].
    pub popularity: u8,
    pub followers: u64,
    /// Canonical profile URL.
    pub url: String,
    pub uri: Option<String>,
    pub images: Vec<ArtistImage>,
}

/// Search result entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistSummary {
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: u8,
    pub followers: u64,
    pub url: String,
}

impl From<ArtistDetail> for ArtistSummary {
    fn from(detail: ArtistDetail) -> Self {
        ArtistSummary {
            name: detail.name,
            genres: detail.genres,
            popularity: detail.popularity,
            followers: detail.followers,
            url: detail.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtistSearch {
    Matches(Vec<ArtistSummary>),
    NoMatches,
}

impl ArtistSearch {
    pub fn from_summaries(summaries: Vec<ArtistSummary>) -> Self {
        if summaries.is_empty() {
            ArtistSearch::NoMatches
        } else {
            ArtistSearch::Matches(summaries)
        }
    }
}

// =============================================================================
// Spotify Web API payloads
// =============================================================================

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyFollowers {
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyImage {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub popularity: u32,
    pub followers: SpotifyFollowers,
    pub external_urls: SpotifyExternalUrls,
    pub uri: Option<String>,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyArtistPage {
    #[serde(default)]
    pub items: Vec<SpotifyArtist>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifySearchResponse {
    pub artists: SpotifyArtistPage,
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyTokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyErrorDetail {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyErrorBody {
    pub error: SpotifyErrorDetail,
}

impl TryFrom<SpotifyArtist> for ArtistDetail {
    type Error = ProviderError;

    fn try_from(artist: SpotifyArtist) -> Result<Self, Self::Error> {
        let popularity = u8::try_from(artist.popularity)
            .ok()
            .filter(|p| *p <= MAX_POPULARITY)
            .ok_or_else(|| {
                ProviderError::InvalidResponse(format!(
                    "artist {} has popularity {} outside 0..={}",
                    artist.id, artist.popularity, MAX_POPULARITY
                ))
            })?;
        let url = artist.external_urls.spotify.ok_or_else(|| {
            ProviderError::InvalidResponse(format!("artist {} has no profile url", artist.id))
        })?;

        Ok(ArtistDetail {
            id: artist.id,
            name: artist.name,
            genres: artist.genres,
            popularity,
            followers: artist.followers.total,
            url,
            uri: artist.uri,
            images: artist
                .images
                .into_iter()
                .map(|i| ArtistImage {
                    url: i.url,
                    width: i.width,
                    height: i.height,
                })
                .collect(),
        })
    }
}
