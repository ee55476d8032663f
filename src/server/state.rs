use axum::extract::FromRef;

use crate::artist_store::ArtistMappingStore;
use crate::provider::ArtistDirectory;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedArtistStore = Arc<dyn ArtistMappingStore>;
pub type GuardedArtistDirectory = Arc<dyn ArtistDirectory>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub artist_store: GuardedArtistStore,
    pub artist_directory: GuardedArtistDirectory,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        artist_store: GuardedArtistStore,
        artist_directory: GuardedArtistDirectory,
    ) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            artist_store,
            artist_directory,
        }
    }
}

impl FromRef<ServerState> for GuardedArtistStore {
    fn from_ref(input: &ServerState) -> Self {
        input.artist_store.clone()
    }
}

impl FromRef<ServerState> for GuardedArtistDirectory {
    fn from_ref(input: &ServerState) -> Self {
        input.artist_directory.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
