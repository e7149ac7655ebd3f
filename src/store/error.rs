use std::time::Duration;
use thiserror::Error;

/// Failure to establish a handle to the backing store.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),

    #[error("Handshake with the store failed: {0}")]
    Handshake(String),

    #[error("Handshake with the store timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure of a query issued over an established handle.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Failed to decode stored record: {0}")]
    Decode(String),

    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    #[error("Store handle is no longer connected")]
    Disconnected,
}
