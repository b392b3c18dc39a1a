//! In-Process Cache Backend
//!
//! HashMap storage with per-entry TTL expiration.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{check_write, CacheConnector, CacheEntry, CacheState};
use crate::error::CacheError;
use crate::lifecycle::StateCell;

// == Memory Cache ==
/// In-process cache used with `memory://` URLs and in tests.
#[derive(Debug)]
pub struct MemoryCache {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry>>,
    state: StateCell,
}

impl MemoryCache {
    // == Constructor ==
    /// Creates an empty cache that is immediately ready.
    pub fn new() -> Self {
        Self::with_state(CacheState::Ready)
    }

    /// Creates a cache that never becomes ready.
    ///
    /// Every operation fails with [`CacheError::Unavailable`].
    pub fn unavailable() -> Self {
        Self::with_state(CacheState::NotReady)
    }

    fn with_state(state: CacheState) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            state: StateCell::new(state as u8),
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheConnector for MemoryCache {
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

        let entry = CacheEntry::new(value.to_string(), ttl_secs)?;
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if !self.is_ready() {
            return Err(CacheError::Unavailable);
        }

        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone()))
    }
}
