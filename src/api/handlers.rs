//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, warn};

use crate::cache::CacheConnector;
use crate::config::{CacheWritePolicy, Config};
use crate::error::{ApiError, Result};
use crate::models::{fixed_users, HealthResponse, InfoResponse, User};
use crate::store::StoreLink;

/// Cache key the user list is written under
pub const USERS_CACHE_KEY: &str = "users";

/// Application state shared across all handlers.
///
/// Connectors are injected as trait objects so handlers never touch process
/// globals and tests can substitute their own.
#[derive(Clone)]
pub struct AppState {
    /// Document store readiness
    pub store: Arc<dyn StoreLink>,
    /// Key-value cache
    pub cache: Arc<dyn CacheConnector>,
    /// Fixed, read-only user list
    pub users: Arc<[User]>,
    /// TTL in seconds for the cached user list
    pub users_cache_ttl: u64,
    /// Whether the user list response waits for its cache write
    pub cache_write_policy: CacheWritePolicy,
}

impl AppState {
    /// Creates a new AppState with default cache settings.
    pub fn new(store: Arc<dyn StoreLink>, cache: Arc<dyn CacheConnector>) -> Self {
        Self::from_config(&Config::default(), store, cache)
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn StoreLink>,
        cache: Arc<dyn CacheConnector>,
    ) -> Self {
        Self {
            store,
            cache,
            users: fixed_users().into(),
            users_cache_ttl: config.users_cache_ttl,
            cache_write_policy: config.cache_write_policy,
        }
    }

    /// Replaces the cache write policy.
    pub fn with_cache_write_policy(mut self, policy: CacheWritePolicy) -> Self {
        self.cache_write_policy = policy;
        self
    }
}

/// Handler for GET /
///
/// Returns service name, version and the current time.
pub async fn info_handler() -> Json<InfoResponse> {
    Json(InfoResponse::now())
}

/// Handler for GET /health
///
/// Reports store and cache connectivity. The `status` field is always
/// "healthy"; callers inspect `database` and `cache` for sub-system state.
///
/// `database` and `cache` reflect the outcome of each connector's initial
/// handshake, not a live check: a store that goes down after connecting is
/// still reported as "connected".
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(
        state.store.is_connected(),
        state.cache.is_ready(),
    ))
}

/// Handler for GET /api/users
///
/// Writes the user list to the cache under [`USERS_CACHE_KEY`] and returns it.
/// With [`CacheWritePolicy::Blocking`] a failed write fails the request; with
/// [`CacheWritePolicy::Detached`] the write runs in the background.
pub async fn list_users_handler(State(state): State<AppState>) -> Result<Response> {
    let payload = serde_json::to_string(&*state.users)?;
    let ttl = state.users_cache_ttl;

    match state.cache_write_policy {
        CacheWritePolicy::Blocking => {
            state
                .cache
                .set_with_expiry(USERS_CACHE_KEY, ttl, &payload)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to cache user list");
                    ApiError::CacheWrite(e)
                })?;
        }
        CacheWritePolicy::Detached => {
            let cache = Arc::clone(&state.cache);
            let value = payload.clone();
            tokio::spawn(async move {
                match cache.set_with_expiry(USERS_CACHE_KEY, ttl, &value).await {
                    Ok(()) => debug!("Cached user list"),
                    Err(e) => warn!(error = %e, "Background user list cache write failed"),
                }
            });
        }
    }

    Ok(([(header::CONTENT_TYPE, "application/json")], payload).into_response())
}
