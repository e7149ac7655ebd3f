//! Backing Store Module
//!
//! Defines the contract between the lookup pipeline and whatever document store
//! holds the student records.
//!
//! ## Core Concepts
//! - **Connector**: Performs the connection handshake and hands out a `StoreHandle`.
//! - **Handle**: A live, shareable connection. Reports its own liveness cheaply
//!   (no round trip) and executes filtered reads against a named collection.
//! - **Backends**: `memory` keeps collections in-process (local runs, tests);
//!   `mongo` talks to a MongoDB deployment through the official driver.

pub mod error;
pub mod memory;
pub mod mongo;


use crate::lookup::filter::Filter;
use crate::lookup::types::StudentRecord;
use async_trait::async_trait;
use std::sync::Arc;

pub use error::{ConnectionError, StoreError};

/// An opened connection to the backing store.
///
/// Handles are shared between concurrent lookups, so implementations must be
/// safe for parallel use. Pooling, if any, is the implementation's business.
#[async_trait]
pub trait StoreHandle: Send + Sync {
    /// Liveness check. Must not touch the network.
    fn is_connected(&self) -> bool;

    /// Runs `filter` against `collection` and returns every matching record.
    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<StudentRecord>, StoreError>;
}

/// Factory for new handles. Each call performs a full handshake.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn StoreHandle>, ConnectionError>;
}
