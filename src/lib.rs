//! Route Roster Library
//!
//! Locates students on school transport routes and serves them through a
//! filtered lookup endpoint consumed by a map front end.
//!
//! ## Architecture Modules
//! - **`config`**: Command-line and environment configuration, frozen at startup.
//! - **`connection`**: The connection manager. Lazily opens one store handle,
//!   reuses it while it stays live and reconnects when it goes stale.
//! - **`lookup`**: Criteria translation (prefix / substring / exact matching per
//!   field), query execution and the HTTP surface.
//! - **`store`**: Backing-store contract plus the in-memory and MongoDB backends.

pub mod config;
pub mod connection;
pub mod lookup;
pub mod store;
