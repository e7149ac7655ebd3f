//! Student Lookup Module
//!
//! Turns loosely-typed HTTP query parameters into a store filter and returns
//! the matching student records.
//!
//! ## Pipeline
//! request → method gate → `ConnectionManager::acquire()` → `Filter::from_criteria`
//! → `StoreHandle::query` → JSON array
//!
//! Sorting is left to the consumer. Query results are never cached; only the
//! store handle is.
//!
//! ## Submodules
//! - **`types`**: `StudentRecord` and `Criteria`.
//! - **`filter`**: Per-field match semantics and the store-neutral `Filter`.
//! - **`service`**: `LookupService`, the filter-and-execute core.
//! - **`handlers`**: Axum handlers and error-to-HTTP mapping.
//! - **`protocol`**: Endpoint paths and response envelopes.

pub mod filter;
pub mod handlers;
pub mod protocol;
pub mod service;
pub mod types;
