//! Local stand-in for the Spotify Web API
//!
//! Serves the token endpoint and the artist/search endpoints on a random
//! port, and counts the calls it receives so tests can assert on caching.

use super::constants::*;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Default)]
struct StubCounters {
    token_requests: AtomicUsize,
    api_requests: AtomicUsize,
    token_lifetime_secs: AtomicU64,
    reject_credentials: AtomicBool,
    last_search_query: Mutex<Option<HashMap<String, String>>>,
}

/// Running stub provider. Shuts down when dropped.
pub struct StubProvider {
    /// Root URL, e.g. "http://127.0.0.1:12345"
    pub base_url: String,
    counters: Arc<StubCounters>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

fn artist_json(id: &str, name: &str, popularity: u32, followers: u64) -> Value {
    json!({
        "external_urls": { "spotify": format!("https://open.spotify.com/artist/{}", id) },
        "followers": { "href": null, "total": followers },
        "genres": ["alternative rock", "art rock"],
        "href": format!("https://api.spotify.com/v1/artists/{}", id),
        "id": id,
        "images": [
            { "url": "https://i.scdn.co/image/large", "height": 640, "width": 640 },
            { "url": "https://i.scdn.co/image/small", "height": 160, "width": 160 }
        ],
        "name": name,
        "popularity": popularity,
        "type": "artist",
        "uri": format!("spotify:artist:{}", id)
    })
}

fn spotify_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "status": status.as_u16(), "message": message } })),
    )
        .into_response()
}

fn is_authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", STUB_ACCESS_TOKEN))
        .unwrap_or(false)
}

async fn post_token(State(counters): State<Arc<StubCounters>>, headers: HeaderMap) -> Response {
    counters.token_requests.fetch_add(1, Ordering::SeqCst);

    let has_basic_auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("Basic "))
        .unwrap_or(false);
    if !has_basic_auth || counters.reject_credentials.load(Ordering::SeqCst) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_client", "error_description": "Invalid client" })),
        )
            .into_response();
    }

    Json(json!({
        "access_token": STUB_ACCESS_TOKEN,
        "token_type": "Bearer",
        "expires_in": counters.token_lifetime_secs.load(Ordering::SeqCst),
    }))
    .into_response()
}

async fn get_artist(
    State(counters): State<Arc<StubCounters>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    counters.api_requests.fetch_add(1, Ordering::SeqCst);
    if !is_authorized(&headers) {
        return spotify_error(StatusCode::UNAUTHORIZED, "No token provided");
    }

    match id.as_str() {
        RADIOHEAD_SPOTIFY_ID => {
            Json(artist_json(id.as_str(), RADIOHEAD_NAME, 79, 9_876_543)).into_response()
        }
        RATE_LIMITED_ARTIST_ID => {
            spotify_error(StatusCode::TOO_MANY_REQUESTS, "API rate limit exceeded")
        }
        REVOKED_TOKEN_ARTIST_ID => {
            spotify_error(StatusCode::UNAUTHORIZED, "The access token expired")
        }
        FAILING_ARTIST_ID => spotify_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
        MALFORMED_ARTIST_ID => Json(json!({ "id": MALFORMED_ARTIST_ID })).into_response(),
        _ => spotify_error(StatusCode::NOT_FOUND, "Resource not found"),
    }
}

async fn search(
    State(counters): State<Arc<StubCounters>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    counters.api_requests.fetch_add(1, Ordering::SeqCst);
    if !is_authorized(&headers) {
        return spotify_error(StatusCode::UNAUTHORIZED, "No token provided");
    }
    *counters.last_search_query.lock().unwrap() = Some(params.clone());

    let items = match params.get("q").map(String::as_str) {
        Some("artist:Radiohead") => vec![
            artist_json(RADIOHEAD_SPOTIFY_ID, RADIOHEAD_NAME, 79, 9_876_543),
            artist_json("tribute-band", TRIBUTE_NAME, 12, 345),
        ],
        _ => vec![],
    };
    let limit: usize = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(20);
    let items: Vec<Value> = items.into_iter().take(limit).collect();

    Json(json!({
        "artists": {
            "href": "https://api.spotify.com/v1/search",
            "items": items,
            "limit": limit,
            "offset": 0,
            "total": items.len()
        }
    }))
    .into_response()
}

impl StubProvider {
    /// Spawns the stub on a random port. Tokens last one hour by default.
    pub async fn spawn() -> Self {
        let counters = Arc::new(StubCounters::default());
        counters.token_lifetime_secs.store(3600, Ordering::SeqCst);

        let app = Router::new()
            .route("/api/token", post(post_token))
            .route("/v1/artists/{id}", get(get_artist))
            .route("/v1/search", get(search))
            .with_state(counters.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub provider");
        let port = listener
            .local_addr()
            .expect("Failed to get stub provider address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Stub provider failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            counters,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn api_url(&self) -> String {
        format!("{}/v1", self.base_url)
    }

    pub fn auth_url(&self) -> String {
        format!("{}/api/token", self.base_url)
    }

    pub fn token_requests(&self) -> usize {
        self.counters.token_requests.load(Ordering::SeqCst)
    }

    pub fn api_requests(&self) -> usize {
        self.counters.api_requests.load(Ordering::SeqCst)
    }

    pub fn set_token_lifetime_secs(&self, secs: u64) {
        self.counters.token_lifetime_secs.store(secs, Ordering::SeqCst);
    }

    pub fn reject_credentials(&self) {
        self.counters.reject_credentials.store(true, Ordering::SeqCst);
    }

    pub fn last_search_query(&self) -> Option<HashMap<String, String>> {
        self.counters.last_search_query.lock().unwrap().clone()
    }
}

impl Drop for StubProvider {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
