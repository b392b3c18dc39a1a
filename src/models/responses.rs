//! Response DTOs for the API server
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Message returned by the root endpoint.
pub const SERVICE_MESSAGE: &str = "Bedrock Test API";

/// Response body for the root endpoint (GET /)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    /// Service description
    pub message: String,
    /// Service version
    pub version: String,
    /// Current time, ISO 8601 UTC with millisecond precision
    pub timestamp: String,
}

impl InfoResponse {
    /// Creates an InfoResponse stamped with the current time
    pub fn now() -> Self {
        Self {
            message: SERVICE_MESSAGE.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: iso_timestamp(),
        }
    }
}

/// Connection status of a backing store as reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Connected,
    Disconnected,
}

impl From<bool> for LinkStatus {
    fn from(up: bool) -> Self {
        if up {
            LinkStatus::Connected
        } else {
            LinkStatus::Disconnected
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy"; sub-system state is reported in the other fields
    pub status: String,
    /// Document store connection status
    pub database: LinkStatus,
    /// Cache connection status
    pub cache: LinkStatus,
}

impl HealthResponse {
    /// Creates a HealthResponse from the connector readiness flags
    pub fn new(database_up: bool, cache_up: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            database: database_up.into(),
            cache: cache_up.into(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Formats the current UTC time as e.g. `2025-01-01T12:00:00.000Z`.
pub fn iso_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Formats `at` with millisecond precision and a `Z` suffix.
///
/// The output is fixed width for years 0000-9999, so string order matches
/// time order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
