//! Users API - A small health-aware HTTP service
//!
//! Serves service info, a health report and a fixed user list that is written
//! through to a Redis cache, alongside a MongoDB readiness check.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::{connect_cache, CacheConnector, CacheState, MemoryCache, RedisCache};
pub use config::Config;
pub use store::{MongoStore, StoreLink, StoreState};
