mod file_config;

pub use file_config::{FileConfig, SpotifyFileConfig};

use crate::artist_store::DEFAULT_BUSY_TIMEOUT;
use crate::provider::{SpotifyConfig, SPOTIFY_API_BASE, SPOTIFY_AUTH_URL};
use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub request_timeout_sec: u64,
    pub provider_timeout_sec: u64,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_api_url: Option<String>,
    pub spotify_auth_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub request_timeout_sec: u64,
    pub provider_timeout_sec: u64,
    pub spotify: SpotifySettings,
}

#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub api_url: String,
    pub auth_url: String,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| anyhow!("db_path must be specified via --db-path or in config file"))?;

        let db_dir = match db_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !db_dir.is_dir() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }

        let host = file.host.unwrap_or_else(|| cli.host.clone());
        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let request_timeout_sec = file.request_timeout_sec.unwrap_or(cli.request_timeout_sec);
        let provider_timeout_sec = file
            .provider_timeout_sec
            .unwrap_or(cli.provider_timeout_sec);
        if request_timeout_sec == 0 || provider_timeout_sec == 0 {
            bail!("Timeouts must be greater than zero seconds");
        }
        // A store write still waiting on the database lock when the request
        // times out would commit after the client got its 408.
        if Duration::from_secs(request_timeout_sec) <= DEFAULT_BUSY_TIMEOUT {
            bail!(
                "request_timeout_sec must be longer than the database busy timeout ({}s)",
                DEFAULT_BUSY_TIMEOUT.as_secs()
            );
        }

        // [spotify] table takes precedence over CLI args and environment
        let spotify_file = file.spotify.unwrap_or_default();
        let client_id = non_empty(spotify_file.client_id)
            .or_else(|| non_empty(cli.spotify_client_id.clone()))
            .ok_or_else(|| {
                anyhow!("Spotify client id must be specified via --spotify-client-id, SPOTIFY_CLIENT_ID or in config file")
            })?;
        let client_secret = non_empty(spotify_file.client_secret)
            .or_else(|| non_empty(cli.spotify_client_secret.clone()))
            .ok_or_else(|| {
                anyhow!("Spotify client secret must be specified via --spotify-client-secret, SPOTIFY_CLIENT_SECRET or in config file")
            })?;
        let api_url = spotify_file
            .api_url
            .or_else(|| cli.spotify_api_url.clone())
            .unwrap_or_else(|| SPOTIFY_API_BASE.to_string());
        let auth_url = spotify_file
            .auth_url
            .or_else(|| cli.spotify_auth_url.clone())
            .unwrap_or_else(|| SPOTIFY_AUTH_URL.to_string());

        Ok(Self {
            db_path,
            host,
            port,
            logging_level,
            request_timeout_sec,
            provider_timeout_sec,
            spotify: SpotifySettings {
                client_id,
                client_secret,
                api_url,
                auth_url,
            },
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            host: self.host.clone(),
            port: self.port,
            request_timeout_sec: self.request_timeout_sec,
        }
    }

    pub fn spotify_config(&self) -> SpotifyConfig {
        SpotifyConfig {
            client_id: self.spotify.client_id.clone(),
            client_secret: self.spotify.client_secret.clone(),
            api_base_url: self.spotify.api_url.clone(),
            auth_url: self.spotify.auth_url.clone(),
            timeout: Duration::from_secs(self.provider_timeout_sec),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
