use addressbook_server::client::{DocumentBackend, WriteOutcome};
use addressbook_server::error::{BackendError, BackendResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Documents = Vec<(String, Value)>;

/// Mock document backend for testing.
///
/// Keeps each index in memory in insertion order and tracks method calls for
/// verification. Search matches a query as a case-insensitive substring of the
/// document's JSON text.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockDocumentBackend {
    indices: Arc<Mutex<HashMap<String, Documents>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    failure: Arc<Mutex<Option<String>>>,
    put_outcome: Arc<Mutex<Option<WriteOutcome>>>,
}

#[allow(dead_code)]
impl MockDocumentBackend {
    /// Create a new backend with no indices.
    pub fn new() -> Self {
        Self {
            indices: Arc::new(Mutex::new(HashMap::new())),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
            failure: Arc::new(Mutex::new(None)),
            put_outcome: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a backend with an empty index already present.
    pub fn with_index(index: &str) -> Self {
        let backend = Self::new();
        backend
            .indices
            .lock()
            .unwrap()
            .insert(index.to_string(), Vec::new());
        backend
    }

    /// Store a raw document, bypassing the contact store.
    pub fn insert_raw(&self, index: &str, id: &str, document: Value) {
        let mut indices = self.indices.lock().unwrap();
        let documents = indices.entry(index.to_string()).or_default();
        documents.retain(|(existing, _)| existing != id);
        documents.push((id.to_string(), document));
    }

    pub fn document(&self, index: &str, id: &str) -> Option<Value> {
        let indices = self.indices.lock().unwrap();
        indices
            .get(index)
            .and_then(|docs| docs.iter().find(|(existing, _)| existing == id))
            .map(|(_, doc)| doc.clone())
    }

    pub fn has_index(&self, index: &str) -> bool {
        self.indices.lock().unwrap().contains_key(index)
    }

    /// Make every following call fail with a 503 carrying `message`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Report `outcome` for every following put, whatever actually happened.
    pub fn force_put_outcome(&self, outcome: WriteOutcome) {
        *self.put_outcome.lock().unwrap() = Some(outcome);
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// Reset all call counts.
    pub fn reset_call_counts(&self) {
        self.call_counts.lock().unwrap().clear();
    }

    fn track_call(&self, method: &str) -> BackendResult<()> {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;

        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(BackendError::ApiError {
                status: 503,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for MockDocumentBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentBackend for MockDocumentBackend {
    async fn index_exists(&self, index: &str) -> BackendResult<bool> {
        self.track_call("index_exists")?;
        Ok(self.has_index(index))
    }

    async fn create_index(&self, index: &str) -> BackendResult<()> {
        self.track_call("create_index")?;
        let mut indices = self.indices.lock().unwrap();
        if indices.contains_key(index) {
            return Err(BackendError::ApiError {
                status: 400,
                message: format!("resource_already_exists_exception: {}", index),
            });
        }
        indices.insert(index.to_string(), Vec::new());
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> BackendResult<()> {
        self.track_call("delete_index")?;
        match self.indices.lock().unwrap().remove(index) {
            Some(_) => Ok(()),
            None => Err(BackendError::ApiError {
                status: 404,
                message: format!("index_not_found_exception: {}", index),
            }),
        }
    }

    async fn put_document(
        &self,
        index: &str,
        id: &str,
        body: &Value,
    ) -> BackendResult<WriteOutcome> {
        self.track_call("put_document")?;

        let mut indices = self.indices.lock().unwrap();
        let documents = indices.entry(index.to_string()).or_default();
        let outcome = match documents.iter_mut().find(|(existing, _)| existing == id) {
            Some((_, doc)) => {
                *doc = body.clone();
                WriteOutcome::Updated
            }
            None => {
                documents.push((id.to_string(), body.clone()));
                WriteOutcome::Created
            }
        };

        let forced = *self.put_outcome.lock().unwrap();
        Ok(forced.unwrap_or(outcome))
    }

    async fn get_document(&self, index: &str, id: &str) -> BackendResult<Option<Value>> {
        self.track_call("get_document")?;
        Ok(self.document(index, id))
    }

    async fn document_exists(&self, index: &str, id: &str) -> BackendResult<bool> {
        self.track_call("document_exists")?;
        Ok(self.document(index, id).is_some())
    }

    async fn delete_document(&self, index: &str, id: &str) -> BackendResult<WriteOutcome> {
        self.track_call("delete_document")?;

        let mut indices = self.indices.lock().unwrap();
        let Some(documents) = indices.get_mut(index) else {
            return Ok(WriteOutcome::NotFound);
        };
        let before = documents.len();
        documents.retain(|(existing, _)| existing != id);
        if documents.len() < before {
            Ok(WriteOutcome::Deleted)
        } else {
            Ok(WriteOutcome::NotFound)
        }
    }

    async fn search(
        &self,
        index: &str,
        query: Option<&str>,
        from: u64,
        size: u64,
    ) -> BackendResult<Vec<Value>> {
        self.track_call("search")?;

        let indices = self.indices.lock().unwrap();
        let Some(documents) = indices.get(index) else {
            return Err(BackendError::ApiError {
                status: 404,
                message: format!("index_not_found_exception: {}", index),
            });
        };
        let needle = query.map(str::to_lowercase);

        Ok(documents
            .iter()
            .filter(|(_, doc)| match &needle {
                Some(needle) => doc.to_string().to_lowercase().contains(needle),
                None => true,
            })
            .skip(from as usize)
            .take(size as usize)
            .map(|(_, doc)| doc.clone())
            .collect())
    }
}
