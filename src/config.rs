//! Process Configuration
//!
//! Command-line flags with environment fallbacks. Values are read once at
//! startup and frozen into a `ConnectionConfig` shared by the connection
//! manager and the lookup service.

use crate::store::ConnectionError;
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Collection holding the student documents.
pub const DEFAULT_COLLECTION: &str = "School_Transport";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// MongoDB deployment reached through `--mongodb-uri`.
    Mongo,
    /// In-process store, optionally seeded from `--seed-file`.
    Memory,
}

/// Route Roster HTTP server
#[derive(Parser, Debug)]
#[command(name = "route-roster")]
#[command(about = "Serves filtered student lookups for school transport routes")]
pub struct Args {
    /// Connection string of the document store
    #[arg(long, env = "MONGODB_URI")]
    pub mongodb_uri: Option<String>,

    /// Database holding the student collection
    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    /// Collection holding the student records
    #[arg(long, default_value = DEFAULT_COLLECTION, env = "COLLECTION_NAME")]
    pub collection: String,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0:5000", env = "LISTEN_ADDR")]
    pub listen: SocketAddr,

    /// Upper bound on the connection handshake, in milliseconds
    #[arg(long, default_value = "10000", env = "CONNECT_TIMEOUT_MS")]
    pub connect_timeout_ms: u64,

    /// Upper bound on a single lookup query, in milliseconds
    #[arg(long, default_value = "30000", env = "QUERY_TIMEOUT_MS")]
    pub query_timeout_ms: u64,

    /// Store backend
    #[arg(long, value_enum, default_value = "mongo", env = "STORE_BACKEND")]
    pub backend: Backend,

    /// JSON array of student records loaded into the memory backend
    #[arg(long, env = "SEED_FILE")]
    pub seed_file: Option<PathBuf>,
}

/// Immutable store settings for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub connect_timeout: Duration,
    pub query_timeout: Duration,
}

impl Args {
    /// Resolves the store settings. The Mongo backend needs both a URI and a
    /// database name; the memory backend needs neither.
    pub fn connection_config(&self) -> Result<ConnectionConfig, ConnectionError> {
        let (uri, database) = match self.backend {
            Backend::Mongo => {
                let uri = non_empty(&self.mongodb_uri).ok_or_else(|| {
                    ConnectionError::InvalidConfig("MONGODB_URI is not set".to_string())
                })?;
                let database = non_empty(&self.db_name).ok_or_else(|| {
                    ConnectionError::InvalidConfig("DB_NAME is not set".to_string())
                })?;
                (uri, database)
            }
            Backend::Memory => (
                non_empty(&self.mongodb_uri).unwrap_or_else(|| "memory://local".to_string()),
                non_empty(&self.db_name).unwrap_or_else(|| "memory".to_string()),
            ),
        };

        if self.connect_timeout_ms == 0 || self.query_timeout_ms == 0 {
            return Err(ConnectionError::InvalidConfig(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        Ok(ConnectionConfig {
            uri,
            database,
            collection: self.collection.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            query_timeout: Duration::from_millis(self.query_timeout_ms),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env fallbacks would leak the host environment into these tests, so every
    // case passes its values explicitly.

    #[test]
    fn test_mongo_backend_requires_uri_and_database() {
        let args = Args::try_parse_from([
            "route-roster",
            "--backend",
            "mongo",
            "--mongodb-uri",
            "mongodb://localhost:27017",
            "--db-name",
            "",
        ])
        .unwrap();

        let result = args.connection_config();
        assert!(matches!(result, Err(ConnectionError::InvalidConfig(_))));
    }

    #[test]
    fn test_mongo_backend_config_resolves() {
        let args = Args::try_parse_from([
            "route-roster",
            "--backend",
            "mongo",
            "--mongodb-uri",
            "mongodb://localhost:27017",
            "--db-name",
            "transport",
            "--collection",
            "School_Transport",
            "--connect-timeout-ms",
            "1500",
            "--query-timeout-ms",
            "2500",
        ])
        .unwrap();

        let config = args.connection_config().unwrap();
        assert_eq!(config.uri, "mongodb://localhost:27017");
        assert_eq!(config.database, "transport");
        assert_eq!(config.collection, "School_Transport");
        assert_eq!(config.connect_timeout, Duration::from_millis(1500));
        assert_eq!(config.query_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_memory_backend_needs_no_uri() {
        let args = Args::try_parse_from([
            "route-roster",
            "--backend",
            "memory",
            "--mongodb-uri",
            "",
            "--db-name",
            "",
        ])
        .unwrap();

        let config = args.connection_config().unwrap();
        assert_eq!(config.uri, "memory://local");
        assert_eq!(config.database, "memory");
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let args = Args::try_parse_from([
            "route-roster",
            "--backend",
            "memory",
            "--query-timeout-ms",
            "0",
        ])
        .unwrap();

        assert!(args.connection_config().is_err());
    }
}
