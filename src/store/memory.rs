//! In-process document store.
//!
//! Collections live in a `DashMap` keyed by collection name. Every handle shares
//! the same data; liveness is tracked with a generation counter so that
//! `disconnect()` invalidates every handle issued before it.

use super::{ConnectionError, StoreConnector, StoreError, StoreHandle};
use crate::lookup::filter::Filter;
use crate::lookup::types::StudentRecord;

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

struct Inner {
    collections: DashMap<String, Vec<StudentRecord>>,
    generation: AtomicU64,
    handshakes: AtomicUsize,
}

#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                collections: DashMap::new(),
                generation: AtomicU64::new(0),
                handshakes: AtomicUsize::new(0),
            }),
        }
    }

    /// Creates a store with `records` preloaded into `collection`.
    pub fn with_records(collection: &str, records: Vec<StudentRecord>) -> Self {
        let store = Self::new();
        store.extend(collection, records);
        store
    }

    pub fn insert(&self, collection: &str, record: StudentRecord) {
        self.inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
    }

    pub fn extend(&self, collection: &str, records: Vec<StudentRecord>) {
        self.inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .extend(records);
    }

    /// Number of records currently held in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.inner
            .collections
            .get(collection)
            .map(|records| records.len())
            .unwrap_or(0)
    }

    /// Number of successful handshakes performed so far.
    pub fn handshake_count(&self) -> usize {
        self.inner.handshakes.load(Ordering::SeqCst)
    }

    /// Drops the connection of every handle issued so far. Handles created
    /// afterwards are unaffected.
    pub fn disconnect(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Memory store disconnected all outstanding handles");
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreConnector for MemoryStore {
    async fn connect(&self) -> Result<Arc<dyn StoreHandle>, ConnectionError> {
        self.inner.handshakes.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MemoryHandle {
            inner: self.inner.clone(),
            generation: self.inner.generation.load(Ordering::SeqCst),
        }))
    }
}

pub struct MemoryHandle {
    inner: Arc<Inner>,
    generation: u64,
}

#[async_trait]
impl StoreHandle for MemoryHandle {
    fn is_connected(&self) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == self.generation
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<StudentRecord>, StoreError> {
        if !self.is_connected() {
            return Err(StoreError::Disconnected);
        }

        let matches: Vec<StudentRecord> = self
            .inner
            .collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| filter.matches(record))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(matches)
    }
}
