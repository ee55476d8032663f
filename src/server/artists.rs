//! Routes under `/artists`.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ApiError;
use super::state::{GuardedArtistDirectory, GuardedArtistStore, ServerState};
use crate::artist_store::ArtistMapping;
use crate::provider::{ArtistDetail, ArtistSearch, ArtistSummary, DEFAULT_SEARCH_LIMIT};

#[derive(Deserialize, Debug)]
struct UpdateArtistParams {
    pub name: String,
    pub id: String,
    pub platform: String,
}

#[derive(Deserialize, Debug)]
struct SearchArtistParams {
    pub name: String,
    pub limit: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::InvalidArgument(rejection.body_text()))
}

async fn get_artist(
    State(directory): State<GuardedArtistDirectory>,
    Path(artist_id): Path<String>,
) -> Result<Json<ArtistDetail>, ApiError> {
    match directory.get_artist(&artist_id).await? {
        Some(artist) => Ok(Json(artist)),
        None => Err(ApiError::NotFound("Artist not found".to_string())),
    }
}

async fn search_artists(
    State(directory): State<GuardedArtistDirectory>,
    query: Result<Query<SearchArtistParams>, QueryRejection>,
) -> Result<Json<Vec<ArtistSummary>>, ApiError> {
    let params = query_params(query)?;
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    match directory.search_artist(&params.name, limit).await? {
        ArtistSearch::Matches(artists) => Ok(Json(artists)),
        ArtistSearch::NoMatches => Err(ApiError::NotFound("No artists found".to_string())),
    }
}

async fn update_artist(
    State(store): State<GuardedArtistStore>,
    query: Result<Query<UpdateArtistParams>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let params = query_params(query)?;
    debug!("update_artist() called with {:?}", params);

    // Lock waits are bounded by the store busy timeout, which config keeps
    // below the request timeout.
    let outcome = tokio::task::spawn_blocking(move || {
        store.upsert_platform_id(&params.name, &params.platform, &params.id)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Artist update task failed: {}", e)))??;

    Ok(Json(MessageResponse {
        message: outcome.message(),
    }))
}

async fn list_artist_mappings(
    State(store): State<GuardedArtistStore>,
) -> Result<Json<Vec<ArtistMapping>>, ApiError> {
    let mappings = tokio::task::spawn_blocking(move || store.list_artist_mappings())
        .await
        .map_err(|e| ApiError::Internal(format!("Artist listing task failed: {}", e)))??;
    Ok(Json(mappings))
}

async fn get_artist_mapping(
    State(store): State<GuardedArtistStore>,
    Path(name): Path<String>,
) -> Result<Json<ArtistMapping>, ApiError> {
    let mapping = tokio::task::spawn_blocking(move || store.get_artist_mapping(&name))
        .await
        .map_err(|e| ApiError::Internal(format!("Artist lookup task failed: {}", e)))??;
    mapping
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Artist mapping not found".to_string()))
}

pub fn artist_routes(state: ServerState) -> Router {
    Router::new()
        .route("/search", get(search_artists))
        .route("/update", post(update_artist))
        .route("/mappings", get(list_artist_mappings))
        .route("/mappings/{name}", get(get_artist_mapping))
        .route("/{artist_id}", get(get_artist))
        .with_state(state)
}
