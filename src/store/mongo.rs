//! MongoDB backend.
//!
//! The handshake is a `ping` against the configured database. Text criteria are
//! sent as case-insensitive `$regex` conditions built from escaped user input,
//! anchored for prefix fields and unanchored for substring fields.

use super::{ConnectionError, StoreConnector, StoreError, StoreHandle};
use crate::config::ConnectionConfig;
use crate::lookup::filter::{Condition, Filter, MatchKind, ROUTE_NO_KEY};
use crate::lookup::types::StudentRecord;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const APP_NAME: &str = "route-roster";

pub struct MongoConnector {
    config: Arc<ConnectionConfig>,
}

impl MongoConnector {
    pub fn new(config: Arc<ConnectionConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StoreConnector for MongoConnector {
    async fn connect(&self) -> Result<Arc<dyn StoreHandle>, ConnectionError> {
        let mut options = ClientOptions::parse(&self.config.uri)
            .await
            .map_err(|e| ConnectionError::InvalidConfig(e.to_string()))?;
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(self.config.connect_timeout);
        options.server_selection_timeout = Some(self.config.connect_timeout);

        let client =
            Client::with_options(options).map_err(|e| ConnectionError::Handshake(e.to_string()))?;
        let database = client.database(&self.config.database);

        database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| ConnectionError::Handshake(e.to_string()))?;

        Ok(Arc::new(MongoHandle::new(database)))
    }
}

pub struct MongoHandle {
    database: Database,
    /// Cleared once the driver reports a transport-level failure.
    connected: AtomicBool,
}

impl MongoHandle {
    pub(crate) fn new(database: Database) -> Self {
        Self {
            database,
            connected: AtomicBool::new(true),
        }
    }

    /// Maps a driver error to a store error. Transport failures also mark the
    /// handle as disconnected so the next acquire reconnects.
    pub(crate) fn classify(&self, err: mongodb::error::Error) -> StoreError {
        match err.kind.as_ref() {
            ErrorKind::Io(_)
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::ConnectionPoolCleared { .. } => {
                tracing::warn!("Store connection lost: {}", err);
                self.connected.store(false, Ordering::SeqCst);
                StoreError::Query(err.to_string())
            }
            ErrorKind::BsonDeserialization(_) => StoreError::Decode(err.to_string()),
            _ => StoreError::Query(err.to_string()),
        }
    }
}

#[async_trait]
impl StoreHandle for MongoHandle {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<StudentRecord>, StoreError> {
        let collection: Collection<StudentRecord> = self.database.collection(collection);
        let cursor = collection
            .find(filter_document(filter), None)
            .await
            .map_err(|e| self.classify(e))?;

        cursor
            .try_collect::<Vec<StudentRecord>>()
            .await
            .map_err(|e| self.classify(e))
    }
}

/// Translates a filter into the equivalent MongoDB query document.
pub fn filter_document(filter: &Filter) -> Document {
    let mut document = Document::new();

    for condition in filter.conditions() {
        match condition {
            Condition::Text { field, needle } => {
                let escaped = regex::escape(needle);
                let pattern = match field.match_kind() {
                    MatchKind::Prefix => format!("^{}", escaped),
                    MatchKind::Substring => escaped,
                };
                document.insert(field.key(), doc! { "$regex": pattern, "$options": "i" });
            }
            Condition::RouteNo(route) => {
                document.insert(ROUTE_NO_KEY, *route);
            }
            Condition::InvalidRouteNo(_) => {
                // An empty `$in` set never matches.
                document.insert(ROUTE_NO_KEY, doc! { "$in": Vec::<Bson>::new() });
            }
        }
    }

    document
}
