//! API Module
//!
//! HTTP handlers, request policy and routing.
//!
//! # Endpoints
//! - `GET /` - Service info
//! - `GET /health` - Health check endpoint
//! - `GET /api/users` - User list

pub mod handlers;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod property_tests;

pub use handlers::*;
pub use middleware::JsonBody;
pub use routes::create_router;
