//! Lookup HTTP Protocol
//!
//! Endpoint paths and the JSON error envelope returned to the front end.

use serde::{Deserialize, Serialize};

/// Filtered student lookup. Query parameters: `Name`, `StudentId`, `RouteNo`,
/// `Address`, `Area`.
pub const ENDPOINT_STUDENTS: &str = "/students";
/// Liveness of the service and of the cached store handle.
pub const ENDPOINT_HEALTH: &str = "/health";

pub const MSG_METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const MSG_INTERNAL_ERROR: &str = "Internal server error";

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Diagnostic text from the underlying failure, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Whether a connected store handle is cached. No handshake is attempted.
    pub store_connected: bool,
}
