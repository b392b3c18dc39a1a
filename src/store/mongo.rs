//! MongoDB Store Connector
//!
//! Opens the document store connection in the background and tracks its state.

use std::sync::{Arc, OnceLock};

use mongodb::{bson::doc, Client};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::{StoreLink, StoreState};
use crate::error::ConnectError;
use crate::lifecycle::StateCell;

/// Connector for the MongoDB document store.
///
/// Starts in [`StoreState::Connecting`]. The handshake runs on a spawned
/// task so startup never waits on it, and a failed handshake leaves the
/// service running in degraded mode.
#[derive(Debug)]
pub struct MongoStore {
    state: StateCell,
    /// Held so the driver's connection pool stays open
    _client: OnceLock<Client>,
}

impl MongoStore {
    pub fn new() -> Self {
        Self {
            state: StateCell::new(StoreState::Connecting as u8),
            _client: OnceLock::new(),
        }
    }

    // == Connect ==
    /// Starts connecting to `uri` in the background.
    ///
    /// The returned handle completes once the store is either connected or
    /// marked disconnected. Callers are free to drop it.
    pub fn connect(self: &Arc<Self>, uri: impl Into<String>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let uri = uri.into();

        tokio::spawn(async move {
            match handshake(&uri).await {
                Ok(client) => {
                    let _ = store._client.set(client);
                    store.transition(StoreState::Connected);
                    info!("Connected to MongoDB");
                }
                Err(e) => {
                    error!(error = %e, "MongoDB connection failed");
                    store.transition(StoreState::Disconnected);
                }
            }
        })
    }

    fn transition(&self, next: StoreState) {
        if !self.state.advance(next as u8) {
            warn!(
                current = ?self.state(),
                requested = ?next,
                "Ignoring backwards store state transition"
            );
        }
    }
}

impl Default for MongoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreLink for MongoStore {
    fn state(&self) -> StoreState {
        StoreState::from_raw(self.state.load())
    }
}

/// Builds a client and verifies the link with a `ping`.
async fn handshake(uri: &str) -> Result<Client, ConnectError> {
    info!("Connecting to MongoDB");
    let client = Client::with_uri_str(uri)
        .await
        .map_err(|e| ConnectError::InvalidUrl(e.to_string()))?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 }, None)
        .await
        .map_err(|e| ConnectError::Unreachable(e.to_string()))?;

    Ok(client)
}
