//! HTTP client for the Elasticsearch document store.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. The client maps HTTP failures into
//! [`BackendError`] and exposes the handful of index and document operations
//! the contact store needs.

mod async_wrapper;
pub use async_wrapper::{AsyncElasticClient, DocumentBackend};

use crate::config::Config;
use crate::error::{BackendError, BackendResult};
use crate::metrics::{Metrics, RequestTimer};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Result reported by the store for a document write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Created,
    Updated,
    Deleted,
    NotFound,
    Noop,
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::NotFound => "not_found",
            Self::Noop => "noop",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    result: WriteOutcome,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(default)]
    found: bool,

    #[serde(rename = "_source", default)]
    source: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    timed_out: bool,

    #[serde(rename = "_shards", default)]
    shards: Option<ShardStats>,

    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct ShardStats {
    #[serde(default)]
    total: u64,

    #[serde(default)]
    failed: u64,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_source")]
    source: Value,
}

/// HTTP client for an Elasticsearch-compatible REST API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`. It is not bound to
/// an index; every operation names the index it targets.
#[derive(Clone)]
pub struct ElasticClient {
    /// Base URL of the server
    base_url: String,

    /// Document type path segment: `_doc`, or a legacy type name on 6.x
    document_type: String,

    /// Whether writes wait for the next index refresh
    refresh_on_write: bool,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl ElasticClient {
    /// Create a new ElasticClient from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.elastic_url.clone(),
            document_type: config.document_type().to_string(),
            refresh_on_write: config.refresh_on_write,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a client for a 7.x-style server at a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            document_type: "_doc".to_string(),
            refresh_on_write: false,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Use a different document type path segment.
    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = document_type.into();
        self
    }

    /// Make writes wait for the index refresh so they are immediately searchable.
    pub fn with_refresh_on_write(mut self, refresh: bool) -> Self {
        self.refresh_on_write = refresh;
        self
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    fn index_path(index: &str) -> String {
        format!("/{}", urlencoding::encode(index))
    }

    fn document_path(&self, index: &str, id: &str) -> String {
        format!(
            "/{}/{}/{}",
            urlencoding::encode(index),
            self.document_type,
            urlencoding::encode(id)
        )
    }

    fn write_path(&self, index: &str, id: &str) -> String {
        let path = self.document_path(index, id);
        if self.refresh_on_write {
            format!("{}?refresh=wait_for", path)
        } else {
            path
        }
    }

    /// Execute a request, returning the raw `ureq` result so callers can
    /// treat specific statuses (usually 404) as answers rather than failures.
    fn execute(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ureq::Response, ureq::Error> {
        let url = self.build_url(path);
        tracing::debug!("{} {}", method, url);

        let timer = RequestTimer::start(&self.metrics);
        let request = self
            .agent
            .request(method, &url)
            .set("Content-Type", "application/json");
        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        match &result {
            Ok(_) | Err(ureq::Error::Status(404, _)) => timer.succeeded(),
            Err(e) => {
                tracing::debug!("{} {} - Error: {}", method, url, e);
                timer.failed();
            }
        }
        result
    }

    /// Map a ureq error to a BackendError.
    fn map_error(&self, error: ureq::Error) -> BackendError {
        match error {
            ureq::Error::Status(status, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());
                BackendError::ApiError { status, message }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    BackendError::HttpError(format!("Connection failed: {}", transport))
                } else if Self::timed_out(&transport) {
                    BackendError::Timeout
                } else {
                    BackendError::HttpError(transport.to_string())
                }
            }
        }
    }

    /// Only a socket read or write that ran out of time counts as a timeout.
    fn timed_out(transport: &ureq::Transport) -> bool {
        transport.kind() == ureq::ErrorKind::Io
            && std::error::Error::source(transport)
                .and_then(|source| source.downcast_ref::<std::io::Error>())
                .map_or(false, |io| {
                    matches!(
                        io.kind(),
                        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
                    )
                })
    }

    fn read_body(response: ureq::Response) -> BackendResult<String> {
        response
            .into_string()
            .map_err(|e| BackendError::HttpError(e.to_string()))
    }

    // ========================= Index Operations =========================

    /// Check whether an index exists.
    pub fn index_exists(&self, index: &str) -> BackendResult<bool> {
        match self.execute("HEAD", &Self::index_path(index), None) {
            Ok(_) => Ok(true),
            Err(ureq::Error::Status(404, _)) => Ok(false),
            Err(e) => Err(self.map_error(e)),
        }
    }

    /// Create an index with default settings.
    pub fn create_index(&self, index: &str) -> BackendResult<()> {
        self.execute("PUT", &Self::index_path(index), None)
            .map_err(|e| self.map_error(e))?;
        tracing::info!("Created index '{}'", index);
        Ok(())
    }

    /// Delete an index and every document in it.
    pub fn delete_index(&self, index: &str) -> BackendResult<()> {
        self.execute("DELETE", &Self::index_path(index), None)
            .map_err(|e| self.map_error(e))?;
        tracing::info!("Deleted index '{}'", index);
        Ok(())
    }

    // ========================= Document Operations =========================

    /// Create or replace the document with the given id.
    pub fn put_document(&self, index: &str, id: &str, body: &Value) -> BackendResult<WriteOutcome> {
        let response = self
            .execute("PUT", &self.write_path(index, id), Some(body))
            .map_err(|e| self.map_error(e))?;
        let response: WriteResponse = serde_json::from_str(&Self::read_body(response)?)?;

        self.metrics.add_document_written();
        Ok(response.result)
    }

    /// Fetch the source of a document, or `None` if there is no such document.
    pub fn get_document(&self, index: &str, id: &str) -> BackendResult<Option<Value>> {
        let response = match self.execute("GET", &self.document_path(index, id), None) {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(e) => return Err(self.map_error(e)),
        };
        let response: GetResponse = serde_json::from_str(&Self::read_body(response)?)?;

        if !response.found {
            return Ok(None);
        }
        self.metrics.add_documents_read(1);
        Ok(response.source)
    }

    /// Check whether a document exists.
    pub fn document_exists(&self, index: &str, id: &str) -> BackendResult<bool> {
        match self.execute("HEAD", &self.document_path(index, id), None) {
            Ok(_) => Ok(true),
            Err(ureq::Error::Status(404, _)) => Ok(false),
            Err(e) => Err(self.map_error(e)),
        }
    }

    /// Delete a document. An absent document yields [`WriteOutcome::NotFound`].
    pub fn delete_document(&self, index: &str, id: &str) -> BackendResult<WriteOutcome> {
        let response = match self.execute("DELETE", &self.write_path(index, id), None) {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(WriteOutcome::NotFound),
            Err(e) => return Err(self.map_error(e)),
        };
        let response: WriteResponse = serde_json::from_str(&Self::read_body(response)?)?;

        self.metrics.add_document_written();
        Ok(response.result)
    }

    /// Run a search and return the hit sources in the order the server ranked them.
    ///
    /// `query` is passed verbatim as a `query_string` expression; `None` matches
    /// every document. Results from a search where some shards failed or timed
    /// out are returned as-is.
    pub fn search(
        &self,
        index: &str,
        query: Option<&str>,
        from: u64,
        size: u64,
    ) -> BackendResult<Vec<Value>> {
        let query = match query {
            Some(q) => json!({ "query_string": { "query": q } }),
            None => json!({ "match_all": {} }),
        };
        let body = json!({ "query": query, "from": from, "size": size });

        let path = format!(
            "{}/_search?allow_partial_search_results=true",
            Self::index_path(index)
        );
        let response = self
            .execute("POST", &path, Some(&body))
            .map_err(|e| self.map_error(e))?;
        let response: SearchResponse = serde_json::from_str(&Self::read_body(response)?)?;

        if let Some(shards) = &response.shards {
            if shards.failed > 0 {
                tracing::warn!(
                    "Search on '{}' returned partial results ({} of {} shards failed)",
                    index,
                    shards.failed,
                    shards.total
                );
            }
        }
        if response.timed_out {
            tracing::warn!("Search on '{}' timed out; returning partial results", index);
        }

        let sources: Vec<Value> = response.hits.hits.into_iter().map(|hit| hit.source).collect();
        self.metrics.add_documents_read(sources.len());
        Ok(sources)
    }
}
