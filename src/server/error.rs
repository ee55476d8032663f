//! Translation of component errors into HTTP responses.

use crate::artist_store::ArtistStoreError;
use crate::provider::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    InvalidArgument(String),
    NotFound(String),
    Provider(ProviderError),
    Storage(ArtistStoreError),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Provider(_) => StatusCode::BAD_GATEWAY,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::InvalidArgument(message)
            | ApiError::NotFound(message)
            | ApiError::Internal(message) => message.clone(),
            ApiError::Provider(err) => format!("Provider error: {}", err),
            ApiError::Storage(err) => format!("Database error: {}", err),
        }
    }
}

impl From<ArtistStoreError> for ApiError {
    fn from(err: ArtistStoreError) -> Self {
        match err {
            ArtistStoreError::InvalidArgument(message) => ApiError::InvalidArgument(message),
            storage => ApiError::Storage(storage),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidArgument(message) => ApiError::InvalidArgument(message),
            other => ApiError::Provider(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        if status.is_server_error() {
            error!("{} {}", status.as_u16(), detail);
        }
        (status, Json(ErrorBody { detail })).into_response()
    }
}
