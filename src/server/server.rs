use anyhow::{Context, Result};
use std::time::Duration;

use tracing::info;

use axum::{
    extract::State, http::StatusCode, middleware, response::IntoResponse, routing::get, Json,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::timeout::TimeoutLayer;

use super::artists::artist_routes;
use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize, Deserialize, Debug)]
pub struct ServerStats {
    pub name: String,
    pub version: String,
    pub uptime: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: format_uptime(state.start_time.elapsed()),
    };
    Json(stats)
}

pub fn make_app(
    config: ServerConfig,
    artist_store: GuardedArtistStore,
    artist_directory: GuardedArtistDirectory,
) -> Router {
    let request_timeout = Duration::from_secs(config.request_timeout_sec);
    let state = ServerState::new(config, artist_store, artist_directory);

    let home_router: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone());

    home_router
        .nest("/artists", artist_routes(state.clone()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(
    config: ServerConfig,
    artist_store: GuardedArtistStore,
    artist_directory: GuardedArtistDirectory,
) -> Result<()> {
    let address = format!("{}:{}", config.host, config.port);
    let app = make_app(config, artist_store, artist_directory);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Ready to serve at {}!", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}
