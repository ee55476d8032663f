//! Spotify Web API client.
//!
//! Authenticates with the client-credentials flow and keeps the access token
//! until shortly before it expires.

use super::directory::{ArtistDirectory, ProviderError, MAX_SEARCH_LIMIT};
use super::models::{
    ArtistDetail, ArtistSearch, ArtistSummary, SpotifyArtist, SpotifyErrorBody,
    SpotifySearchResponse, SpotifyTokenResponse,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
pub const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/api/token";

/// Tokens this close to expiry are refreshed before use.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Longer advertised lifetimes are cut down to this.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_base_url: String,
    pub auth_url: String,
    pub timeout: Duration,
}

impl SpotifyConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base_url: SPOTIFY_API_BASE.to_string(),
            auth_url: SPOTIFY_AUTH_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

fn token_lifetime(expires_in_secs: u64) -> Duration {
    Duration::from_secs(expires_in_secs).min(MAX_TOKEN_LIFETIME)
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        self.expires_at > Instant::now() + TOKEN_EXPIRY_MARGIN
    }
}

pub struct SpotifyClient {
    client: Client,
    client_id: String,
    client_secret: String,
    api_base_url: String,
    auth_url: String,
    token: Mutex<Option<AccessToken>>,
}

impl SpotifyClient {
    pub fn new(config: SpotifyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            client_id: config.client_id,
            client_secret: config.client_secret,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_url: config.auth_url,
            token: Mutex::new(None),
        })
    }

    #[cfg(test)]
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        let mut token = self.token.lock().await;
        if let Some(current) = token.as_ref().filter(|t| t.is_fresh()) {
            return Ok(current.value.clone());
        }

        debug!("Requesting Spotify access token");
        let response = self
            .client
            .post(&self.auth_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
                _ => ProviderError::Auth(format!("token request failed ({}): {}", status, body)),
            });
        }

        let body: SpotifyTokenResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse token response: {}", e))
        })?;
        info!("Obtained Spotify access token, valid for {}s", body.expires_in);

        let value = body.access_token.clone();
        *token = Some(AccessToken {
            value: body.access_token,
            expires_at: Instant::now() + token_lifetime(body.expires_in),
        });
        Ok(value)
    }

    /// Forget the cached token so the next call requests a new one.
    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    /// GET a JSON resource from the API. `Ok(None)` means the provider
    /// answered 404.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, ProviderError> {
        let token = self.access_token().await?;
        let url = format!("{}{}", self.api_base_url, path);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.json::<T>().await.map_err(|e| {
                    ProviderError::InvalidResponse(format!("Failed to parse {}: {}", path, e))
                })?;
                Ok(Some(body))
            }
            status => Err(self.error_for_status(status, response).await),
        }
    }

    async fn error_for_status(&self, status: StatusCode, response: Response) -> ProviderError {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<SpotifyErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or(body);
        warn!("Spotify API answered {}: {}", status, message);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                self.invalidate_token().await;
                ProviderError::Auth(message)
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
            _ => ProviderError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl ArtistDirectory for SpotifyClient {
    async fn get_artist(&self, artist_id: &str) -> Result<Option<ArtistDetail>, ProviderError> {
        if artist_id.is_empty() {
            return Err(ProviderError::InvalidArgument(
                "artist id must not be empty".to_string(),
            ));
        }

        debug!("Fetching artist {} from Spotify", artist_id);
        let path = format!("/artists/{}", urlencoding::encode(artist_id));
        match self.get_json::<SpotifyArtist>(&path, &[]).await? {
            Some(artist) => Ok(Some(ArtistDetail::try_from(artist)?)),
            None => {
                debug!("Spotify has no artist {}", artist_id);
                Ok(None)
            }
        }
    }

    async fn search_artist(&self, name: &str, limit: u32) -> Result<ArtistSearch, ProviderError> {
        if name.is_empty() {
            return Err(ProviderError::InvalidArgument(
                "artist name must not be empty".to_string(),
            ));
        }
        if limit == 0 || limit > MAX_SEARCH_LIMIT {
            return Err(ProviderError::InvalidArgument(format!(
                "limit must be between 1 and {}, got {}",
                MAX_SEARCH_LIMIT, limit
            )));
        }

        debug!("Searching Spotify artists for '{}' (limit {})", name, limit);
        let query = [
            ("q", format!("artist:{}", name)),
            ("type", "artist".to_string()),
            ("limit", limit.to_string()),
        ];
        let response = self
            .get_json::<SpotifySearchResponse>("/search", &query)
            .await?
            .ok_or_else(|| ProviderError::Api {
                status: StatusCode::NOT_FOUND.as_u16(),
                message: "search endpoint not found".to_string(),
            })?;

        let summaries = response
            .artists
            .items
            .into_iter()
            .map(|artist| ArtistDetail::try_from(artist).map(ArtistSummary::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ArtistSearch::from_summaries(summaries))
    }
}
