use std::result;

use axum::response::IntoResponse;
use axum::response::Response;
use common::http::ApiError;
use metadata::error::MetadataError;
use thiserror::Error;

pub type Result<T> = result::Result<T, PlatformError>;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("bad request: {0:?}")]
    BadRequest(String),
    #[error("not found: {0:?}")]
    NotFound(String),
    #[error("internal: {0:?}")]
    Internal(String),
    #[error("serde: {0:?}")]
    Serde(#[from] serde_json::Error),
    #[error("metadata: {0:?}")]
    Metadata(#[from] MetadataError),
    #[error("axum: {0:?}")]
    Axum(#[from] axum::http::Error),
    #[error("other: {0:?}")]
    Other(#[from] anyhow::Error),
}

impl PlatformError {
    /// Everything that is not an explicit client-side condition collapses
    /// to a generic 500 body. Store errors never leak their details.
    pub fn into_api_error(self) -> ApiError {
        match self {
            PlatformError::BadRequest(msg) => ApiError::bad_request(msg),
            PlatformError::NotFound(msg) => ApiError::not_found(msg),
            PlatformError::Metadata(MetadataError::NotFound(msg)) => ApiError::not_found(msg),
            PlatformError::Internal(_)
            | PlatformError::Serde(_)
            | PlatformError::Metadata(_)
            | PlatformError::Axum(_)
            | PlatformError::Other(_) => ApiError::internal("internal server error"),
        }
    }
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        self.into_api_error().into_response()
    }
}
