//! Cache Module
//!
//! Key-value cache connector with two backends: Redis for deployments and an
//! in-process TTL map for local runs and tests.

mod entry;
mod memory;
mod redis_cache;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::error::CacheError;
use crate::tasks::spawn_cleanup_task;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;

/// URL scheme selecting the in-process backend
pub const MEMORY_SCHEME: &str = "memory://";

// == Cache State ==
/// Connection state of the cache.
///
/// Variants are ordered; a connector only ever moves forward through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum CacheState {
    Connecting = 0,
    Ready = 1,
    NotReady = 2,
}

impl CacheState {
    pub(crate) fn from_raw(raw: u8) -> Self {
        match raw {
            0 => CacheState::Connecting,
            1 => CacheState::Ready,
            _ => CacheState::NotReady,
        }
    }
}

// == Cache Connector ==
/// Shared handle to the key-value cache.
#[async_trait]
pub trait CacheConnector: Send + Sync {
    /// Returns the current connection state.
    fn state(&self) -> CacheState;

    /// Returns true iff the cache can currently serve requests.
    fn is_ready(&self) -> bool {
        self.state() == CacheState::Ready
    }

    /// Stores `value` under `key`, expiring after `ttl_secs` seconds.
    ///
    /// # Errors
    /// - [`CacheError::Unavailable`] if the connection is not ready
    /// - [`CacheError::InvalidExpiry`] if `ttl_secs` is zero
    /// - [`CacheError::IoFailure`] on a transport fault
    async fn set_with_expiry(&self, key: &str, ttl_secs: u64, value: &str)
        -> Result<(), CacheError>;

    /// Reads the value stored under `key`, if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
}

/// Checks the preconditions shared by every backend's write path.
pub(crate) fn check_write(state: CacheState, ttl_secs: u64) -> Result<(), CacheError> {
    if state != CacheState::Ready {
        return Err(CacheError::Unavailable);
    }
    if ttl_secs == 0 {
        return Err(CacheError::InvalidExpiry);
    }
    Ok(())
}

// == Connect ==
/// Builds the cache connector for `url` and starts connecting it.
///
/// `memory://` selects the in-process backend and also returns the handle of
/// its expiry sweeper; any other URL is handed to Redis.
pub fn connect_cache(
    url: &str,
    sweep_interval_secs: u64,
) -> (Arc<dyn CacheConnector>, Option<JoinHandle<()>>) {
    if url.starts_with(MEMORY_SCHEME) {
        let cache = Arc::new(MemoryCache::new());
        let sweeper = spawn_cleanup_task(cache.clone(), sweep_interval_secs);
        (cache, Some(sweeper))
    } else {
        let cache = Arc::new(RedisCache::new());
        cache.connect(url);
        (cache, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_write_requires_ready() {
        assert_eq!(
            check_write(CacheState::Connecting, 300),
            Err(CacheError::Unavailable)
        );
        assert_eq!(
            check_write(CacheState::NotReady, 300),
            Err(CacheError::Unavailable)
        );
        assert_eq!(check_write(CacheState::Ready, 300), Ok(()));
    }

    #[test]
    fn test_check_write_rejects_zero_ttl() {
        assert_eq!(
            check_write(CacheState::Ready, 0),
            Err(CacheError::InvalidExpiry)
        );
    }

    #[tokio::test]
    async fn test_connect_cache_memory_scheme() {
        let (cache, sweeper) = connect_cache("memory://", 1);

        assert!(cache.is_ready());
        let sweeper = sweeper.expect("memory backend runs a sweeper");
        sweeper.abort();
    }

    #[tokio::test]
    async fn test_connect_cache_invalid_redis_url() {
        let (cache, sweeper) = connect_cache("not a url", 1);
        assert!(sweeper.is_none());

        // Parsing fails on the connect task; wait for it to settle.
        for _ in 0..50 {
            if cache.state() == CacheState::NotReady {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(cache.state(), CacheState::NotReady);
        assert_eq!(
            cache.set_with_expiry("users", 300, "[]").await,
            Err(CacheError::Unavailable)
        );
    }
}
