//! Connection Manager Tests
//!
//! ## Test Scopes
//! - **Reuse**: Repeated `acquire()` calls share one handshake.
//! - **Recovery**: Stale handles are replaced; failed handshakes never touch the cache.
//! - **Bounds**: Handshakes that hang are cut off by the connect timeout.

#[cfg(test)]
mod tests {
    use crate::connection::manager::ConnectionManager;
    use crate::store::memory::MemoryStore;
    use crate::store::{ConnectionError, StoreConnector, StoreHandle};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Wraps a memory store and refuses handshakes while `failing` is set.
    struct FlakyConnector {
        store: MemoryStore,
        failing: AtomicBool,
        attempts: AtomicUsize,
    }

    impl FlakyConnector {
        fn new(store: MemoryStore) -> Arc<Self> {
            Arc::new(Self {
                store,
                failing: AtomicBool::new(false),
                attempts: AtomicUsize::new(0),
            })
        }

        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StoreConnector for FlakyConnector {
        async fn connect(&self) -> Result<Arc<dyn StoreHandle>, ConnectionError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(ConnectionError::Handshake(
                    "connection refused".to_string(),
                ));
            }
            self.store.connect().await
        }
    }

    /// Never finishes the handshake.
    struct HangingConnector;

    #[async_trait]
    impl StoreConnector for HangingConnector {
        async fn connect(&self) -> Result<Arc<dyn StoreHandle>, ConnectionError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(ConnectionError::Handshake("unreachable".to_string()))
        }
    }

    fn same_handle(a: &Arc<dyn StoreHandle>, b: &Arc<dyn StoreHandle>) -> bool {
        Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
    }

    // ============================================================
    // REUSE
    // ============================================================

    #[tokio::test]
    async fn test_no_handshake_before_first_acquire() {
        let store = MemoryStore::new();
        let manager = ConnectionManager::new(Arc::new(store.clone()), CONNECT_TIMEOUT);

        assert_eq!(store.handshake_count(), 0);
        assert!(!manager.is_connected().await);
    }

    #[tokio::test]
    async fn test_sequential_acquire_reuses_handle() {
        // ARRANGE
        let store = MemoryStore::new();
        let manager = ConnectionManager::new(Arc::new(store.clone()), CONNECT_TIMEOUT);

        // ACT
        let first = manager.acquire().await.unwrap();
        let second = manager.acquire().await.unwrap();

        // ASSERT: One handshake, same handle
        assert_eq!(store.handshake_count(), 1);
        assert!(same_handle(&first, &second));
        assert!(manager.is_connected().await);
    }

    #[tokio::test]
    async fn test_concurrent_acquire_returns_live_handles() {
        let store = MemoryStore::new();
        let manager = ConnectionManager::new(Arc::new(store.clone()), CONNECT_TIMEOUT);

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let manager = manager.clone();
            tasks.push(tokio::spawn(async move { manager.acquire().await }));
        }

        for task in tasks {
            let handle = task.await.unwrap().unwrap();
            assert!(handle.is_connected());
        }

        // Cold-start races may cost extra handshakes, but once settled the
        // cache serves everyone.
        let settled = store.handshake_count();
        assert!(settled >= 1);
        manager.acquire().await.unwrap();
        assert_eq!(store.handshake_count(), settled);
    }

    // ============================================================
    // RECOVERY
    // ============================================================

    #[tokio::test]
    async fn test_stale_handle_triggers_new_handshake() {
        // ARRANGE
        let store = MemoryStore::new();
        let manager = ConnectionManager::new(Arc::new(store.clone()), CONNECT_TIMEOUT);
        let first = manager.acquire().await.unwrap();

        // ACT: Drop every outstanding connection
        store.disconnect();
        let second = manager.acquire().await.unwrap();

        // ASSERT
        assert_eq!(store.handshake_count(), 2);
        assert!(!first.is_connected());
        assert!(second.is_connected());
        assert!(!same_handle(&first, &second));
    }

    #[tokio::test]
    async fn test_failed_handshake_surfaces_error() {
        let connector = FlakyConnector::new(MemoryStore::new());
        connector.set_failing(true);
        let manager = ConnectionManager::new(connector.clone(), CONNECT_TIMEOUT);

        let result = manager.acquire().await;

        match result {
            Err(ConnectionError::Handshake(message)) => {
                assert!(message.contains("connection refused"))
            }
            other => panic!("expected handshake error, got {:?}", other.map(|_| ())),
        }
        assert!(!manager.is_connected().await);
    }

    #[tokio::test]
    async fn test_failed_handshake_is_retried_on_next_acquire() {
        // ARRANGE: First handshake fails
        let store = MemoryStore::new();
        let connector = FlakyConnector::new(store.clone());
        connector.set_failing(true);
        let manager = ConnectionManager::new(connector.clone(), CONNECT_TIMEOUT);
        assert!(manager.acquire().await.is_err());

        // ACT: Store comes back
        connector.set_failing(false);
        let handle = manager.acquire().await.unwrap();

        // ASSERT: Second attempt made a fresh handshake and was cached
        assert_eq!(connector.attempts(), 2);
        assert_eq!(store.handshake_count(), 1);
        assert!(handle.is_connected());
        assert!(manager.is_connected().await);
    }

    #[tokio::test]
    async fn test_failed_reconnect_does_not_poison_cache() {
        // ARRANGE: Healthy handle cached, then it goes stale
        let store = MemoryStore::new();
        let connector = FlakyConnector::new(store.clone());
        let manager = ConnectionManager::new(connector.clone(), CONNECT_TIMEOUT);
        manager.acquire().await.unwrap();
        store.disconnect();

        // ACT: Reconnect fails
        connector.set_failing(true);
        assert!(manager.acquire().await.is_err());

        // ASSERT: Nothing live cached; a later attempt reconnects cleanly
        assert!(!manager.is_connected().await);
        connector.set_failing(false);
        let handle = manager.acquire().await.unwrap();
        assert!(handle.is_connected());
        assert_eq!(connector.attempts(), 3);
        assert_eq!(store.handshake_count(), 2);
    }

    // ============================================================
    // BOUNDS
    // ============================================================

    #[tokio::test]
    async fn test_handshake_timeout() {
        let manager =
            ConnectionManager::new(Arc::new(HangingConnector), Duration::from_millis(50));

        let result = manager.acquire().await;

        assert!(matches!(result, Err(ConnectionError::Timeout(_))));
        assert!(!manager.is_connected().await);
    }
}
