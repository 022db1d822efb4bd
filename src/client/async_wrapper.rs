//! Async wrapper around the synchronous ElasticClient.
//!
//! This module provides an async interface to the synchronous ElasticClient by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime.

use crate::client::{ElasticClient, WriteOutcome};
use crate::error::{BackendError, BackendResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Document operations the contact store needs from its backend.
///
/// Implemented by [`AsyncElasticClient`] for a real server and by in-memory
/// doubles in tests.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    async fn index_exists(&self, index: &str) -> BackendResult<bool>;
    async fn create_index(&self, index: &str) -> BackendResult<()>;
    async fn delete_index(&self, index: &str) -> BackendResult<()>;

    async fn put_document(&self, index: &str, id: &str, body: &Value)
        -> BackendResult<WriteOutcome>;
    async fn get_document(&self, index: &str, id: &str) -> BackendResult<Option<Value>>;
    async fn document_exists(&self, index: &str, id: &str) -> BackendResult<bool>;
    async fn delete_document(&self, index: &str, id: &str) -> BackendResult<WriteOutcome>;

    /// Search `index`; `None` matches everything.
    async fn search(
        &self,
        index: &str,
        query: Option<&str>,
        from: u64,
        size: u64,
    ) -> BackendResult<Vec<Value>>;
}

/// Async wrapper around synchronous ElasticClient.
///
/// Uses `tokio::task::spawn_blocking` to run synchronous HTTP
/// operations on a dedicated thread pool, preventing blocking
/// the async runtime.
#[derive(Clone)]
pub struct AsyncElasticClient {
    client: Arc<ElasticClient>,
}

impl AsyncElasticClient {
    pub fn new(client: ElasticClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn inner(&self) -> &ElasticClient {
        &self.client
    }
}

fn join_error(e: tokio::task::JoinError) -> BackendError {
    BackendError::HttpError(format!("Task join error: {}", e))
}

#[async_trait]
impl DocumentBackend for AsyncElasticClient {
    async fn index_exists(&self, index: &str) -> BackendResult<bool> {
        let client = self.client.clone();
        let index = index.to_string();

        tokio::task::spawn_blocking(move || client.index_exists(&index))
            .await
            .map_err(join_error)?
    }

    async fn create_index(&self, index: &str) -> BackendResult<()> {
        let client = self.client.clone();
        let index = index.to_string();

        tokio::task::spawn_blocking(move || client.create_index(&index))
            .await
            .map_err(join_error)?
    }

    async fn delete_index(&self, index: &str) -> BackendResult<()> {
        let client = self.client.clone();
        let index = index.to_string();

        tokio::task::spawn_blocking(move || client.delete_index(&index))
            .await
            .map_err(join_error)?
    }

    async fn put_document(
        &self,
        index: &str,
        id: &str,
        body: &Value,
    ) -> BackendResult<WriteOutcome> {
        let client = self.client.clone();
        let index = index.to_string();
        let id = id.to_string();
        let body = body.clone();

        tokio::task::spawn_blocking(move || client.put_document(&index, &id, &body))
            .await
            .map_err(join_error)?
    }

    async fn get_document(&self, index: &str, id: &str) -> BackendResult<Option<Value>> {
        let client = self.client.clone();
        let index = index.to_string();
        let id = id.to_string();

        tokio::task::spawn_blocking(move || client.get_document(&index, &id))
            .await
            .map_err(join_error)?
    }

    async fn document_exists(&self, index: &str, id: &str) -> BackendResult<bool> {
        let client = self.client.clone();
        let index = index.to_string();
        let id = id.to_string();

        tokio::task::spawn_blocking(move || client.document_exists(&index, &id))
            .await
            .map_err(join_error)?
    }

    async fn delete_document(&self, index: &str, id: &str) -> BackendResult<WriteOutcome> {
        let client = self.client.clone();
        let index = index.to_string();
        let id = id.to_string();

        tokio::task::spawn_blocking(move || client.delete_document(&index, &id))
            .await
            .map_err(join_error)?
    }

    async fn search(
        &self,
        index: &str,
        query: Option<&str>,
        from: u64,
        size: u64,
    ) -> BackendResult<Vec<Value>> {
        let client = self.client.clone();
        let index = index.to_string();
        let query = query.map(str::to_string);

        tokio::task::spawn_blocking(move || client.search(&index, query.as_deref(), from, size))
            .await
            .map_err(join_error)?
    }
}
