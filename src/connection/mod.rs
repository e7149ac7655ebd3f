//! Connection Manager Module
//!
//! Owns the single reusable store handle shared by every lookup.
//!
//! ## Lifecycle
//! 1. **Lazy**: No handshake happens until the first `acquire()`.
//! 2. **Reuse**: While the cached handle reports itself connected, `acquire()` returns it as-is.
//! 3. **Recovery**: A stale handle triggers a fresh handshake. Only a successful
//!    handshake may replace the cached slot; failures leave it untouched.
//!
//! Failures are never retried here. They propagate to the caller, which turns
//! them into an HTTP error.

pub mod manager;

#[cfg(test)]
mod tests;
