//! API Routes
//!
//! Configures the Axum router with all endpoints and request policy.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, info_handler, list_users_handler, AppState};
use super::middleware::{cors_layer, json_body_guard, security_headers};
use crate::config::Config;
use crate::error::ApiError;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Service info
/// - `GET /health` - Store and cache connectivity
/// - `GET /api/users` - User list, written through to the cache
///
/// Any other method or path yields `404`.
///
/// # Middleware (outermost first)
/// - Tracing: Logs all requests
/// - Security headers on every response
/// - CORS: Allows any origin unless an allow-list is configured
/// - JSON body guard: Rejects malformed JSON bodies with `400`
pub fn create_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/", get(info_handler).fallback(not_found_handler))
        .route("/health", get(health_handler).fallback(not_found_handler))
        .route(
            "/api/users",
            get(list_users_handler).fallback(not_found_handler),
        )
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(
            config.json_body_limit,
            json_body_guard,
        ))
        .layer(cors_layer(&config.cors))
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for unmatched method/path pairs
async fn not_found_handler() -> ApiError {
    ApiError::RouteNotFound
}
