//! Data models for the API server
//!
//! This module defines the user record and the DTOs used for
//! serializing HTTP response bodies.

pub mod responses;
pub mod user;

// Re-export commonly used types
pub use responses::{ErrorResponse, HealthResponse, InfoResponse, LinkStatus};
pub use user::{fixed_users, User};
