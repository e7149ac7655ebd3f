use super::filter::Filter;
use super::types::{Criteria, StudentRecord};
use crate::connection::manager::ConnectionManager;
use crate::store::{ConnectionError, StoreError};

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Translates criteria into a store filter and runs it over the shared handle.
///
/// Results come back in whatever order the store yields them.
pub struct LookupService {
    connections: Arc<ConnectionManager>,
    collection: String,
    query_timeout: Duration,
}

impl LookupService {
    pub fn new(
        connections: Arc<ConnectionManager>,
        collection: impl Into<String>,
        query_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            connections,
            collection: collection.into(),
            query_timeout,
        })
    }

    pub fn connections(&self) -> &Arc<ConnectionManager> {
        &self.connections
    }

    pub async fn lookup(&self, criteria: &Criteria) -> Result<Vec<StudentRecord>, LookupError> {
        let handle = self.connections.acquire().await?;

        let filter = Filter::from_criteria(criteria);
        tracing::debug!(collection = %self.collection, ?filter, "Fetching students");

        let students =
            match tokio::time::timeout(self.query_timeout, handle.query(&self.collection, &filter))
                .await
            {
                Ok(result) => result?,
                Err(_) => return Err(StoreError::Timeout(self.query_timeout).into()),
            };

        tracing::info!("Students fetched successfully: {} record(s)", students.len());
        Ok(students)
    }
}
