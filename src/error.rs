//! Error types for the API server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Connect Error ==
/// Failure to establish a connection to one of the backing stores.
///
/// Never surfaced to clients: connectors log it and move to their
/// disconnected state.
#[derive(Error, Debug)]
pub enum ConnectError {
    /// The connection string could not be parsed
    #[error("Invalid connection string: {0}")]
    InvalidUrl(String),

    /// The store did not answer the connection handshake
    #[error("Connection failed: {0}")]
    Unreachable(String),
}

// == Cache Error Enum ==
/// Errors returned by cache connector operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The cache connection is not ready
    #[error("Cache is not available")]
    Unavailable,

    /// Entries must expire after a positive number of seconds
    #[error("Cache expiry must be a positive number of seconds")]
    InvalidExpiry,

    /// Transport or protocol failure while talking to the cache
    #[error("Cache I/O failure: {0}")]
    IoFailure(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::IoFailure(err.to_string())
    }
}

// == Api Error Enum ==
/// Errors that terminate an HTTP request.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body declared as JSON but could not be parsed
    #[error("Malformed JSON body: {0}")]
    MalformedBody(String),

    /// Request body exceeded the configured limit
    #[error("Request body exceeds limit of {0} bytes")]
    PayloadTooLarge(usize),

    /// No route for this method and path
    #[error("Not found")]
    RouteNotFound,

    /// Writing to the cache failed
    #[error("{0}")]
    CacheWrite(#[from] CacheError),

    /// Response payload could not be serialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::CacheWrite(_) | ApiError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for request handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
