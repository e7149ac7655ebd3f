use crate::store::{ConnectionError, StoreConnector, StoreHandle};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub struct ConnectionManager {
    connector: Arc<dyn StoreConnector>,
    connect_timeout: Duration,
    cached: RwLock<Option<Arc<dyn StoreHandle>>>,
}

impl ConnectionManager {
    pub fn new(connector: Arc<dyn StoreConnector>, connect_timeout: Duration) -> Arc<Self> {
        Arc::new(Self {
            connector,
            connect_timeout,
            cached: RwLock::new(None),
        })
    }

    /// Returns a connected handle, performing a handshake only when the cache
    /// is empty or its handle has gone stale.
    ///
    /// Concurrent cold-start callers may each run a handshake. The first to
    /// install its handle wins; later ones adopt the winner and drop their own.
    pub async fn acquire(&self) -> Result<Arc<dyn StoreHandle>, ConnectionError> {
        if let Some(handle) = self.live_handle().await {
            tracing::debug!("Using cached database instance");
            return Ok(handle);
        }

        tracing::info!("Creating new database connection");
        let handle = match tokio::time::timeout(self.connect_timeout, self.connector.connect()).await
        {
            Ok(Ok(handle)) => handle,
            Ok(Err(e)) => {
                tracing::error!("Failed to connect to database: {}", e);
                return Err(e);
            }
            Err(_) => {
                let e = ConnectionError::Timeout(self.connect_timeout);
                tracing::error!("Failed to connect to database: {}", e);
                return Err(e);
            }
        };

        let mut slot = self.cached.write().await;
        if let Some(existing) = slot.as_ref().filter(|h| h.is_connected()) {
            tracing::debug!("Another request installed a live handle first; discarding ours");
            return Ok(existing.clone());
        }
        *slot = Some(handle.clone());
        tracing::info!("Connected to database");

        Ok(handle)
    }

    /// Whether the cache currently holds a connected handle.
    pub async fn is_connected(&self) -> bool {
        self.live_handle().await.is_some()
    }

    async fn live_handle(&self) -> Option<Arc<dyn StoreHandle>> {
        self.cached
            .read()
            .await
            .as_ref()
            .filter(|h| h.is_connected())
            .cloned()
    }
}
