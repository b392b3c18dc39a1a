//! Redis Cache Backend
//!
//! Connects through a `ConnectionManager`, which reconnects on its own after
//! transport faults.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::{check_write, CacheConnector, CacheState};
use crate::error::{CacheError, ConnectError};
use crate::lifecycle::StateCell;

/// Redis-backed cache connector.
///
/// Starts in [`CacheState::Connecting`] and becomes ready once the
/// connection manager is established.
pub struct RedisCache {
    state: StateCell,
    manager: OnceLock<ConnectionManager>,
}

impl RedisCache {
    pub fn new() -> Self {
        Self {
            state: StateCell::new(CacheState::Connecting as u8),
            manager: OnceLock::new(),
        }
    }

    // == Connect ==
    /// Starts connecting to `url` in the background.
    ///
    /// The returned handle completes once the cache is either ready or
    /// marked not ready. Callers are free to drop it.
    pub fn connect(self: &Arc<Self>, url: &str) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        let url = url.to_string();

        tokio::spawn(async move {
            match open_manager(&url).await {
                Ok(manager) => {
                    let _ = cache.manager.set(manager);
                    cache.state.advance(CacheState::Ready as u8);
                    info!("Connected to Redis");
                }
                Err(e) => {
                    error!(error = %e, "Redis connection failed");
                    cache.state.advance(CacheState::NotReady as u8);
                }
            }
        })
    }

    fn connection(&self) -> Result<ConnectionManager, CacheError> {
        match (self.state(), self.manager.get()) {
            (CacheState::Ready, Some(manager)) => Ok(manager.clone()),
            _ => Err(CacheError::Unavailable),
        }
    }
}

impl Default for RedisCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheConnector for RedisCache {
    fn state(&self) -> CacheState {
        CacheState::from_raw(self.state.load())
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        ttl_secs: u64,
        value: &str,
    ) -> Result<(), CacheError> {
        check_write(self.state(), ttl_secs)?;
        let mut conn = self.connection()?;

        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| {
                warn!(key = %key, error = %e, "Redis SET failed");
                CacheError::from(e)
            })
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection()?;

        redis::cmd("GET")
            .arg(key)
            .query_async::<_, Option<String>>(&mut conn)
            .await
            .map_err(CacheError::from)
    }
}

async fn open_manager(url: &str) -> Result<ConnectionManager, ConnectError> {
    info!("Connecting to Redis");
    let client = Client::open(url).map_err(|e| ConnectError::InvalidUrl(e.to_string()))?;

    client
        .get_connection_manager()
        .await
        .map_err(|e| ConnectError::Unreachable(e.to_string()))
}
