use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::client::{DocumentBackend, WriteOutcome};
use crate::error::{BackendError, ContactError, ContactResult};
use crate::models::Contact;
use crate::repositories::traits::ContactStore;

/// Contact store backed by a document index, one document per contact keyed by name.
///
/// Every operation that depends on existence asks the backend first and
/// raises `NotFound`/`Duplicate` itself, so the error returned never depends on
/// how the backend reports an absent document.
pub struct ElasticContactStore {
    backend: Arc<dyn DocumentBackend>,
    index: String,
}

impl ElasticContactStore {
    /// Create a store over an index that is assumed to exist.
    pub fn new(backend: Arc<dyn DocumentBackend>, index: impl Into<String>) -> Self {
        Self {
            backend,
            index: index.into(),
        }
    }

    /// Create a store, creating the index first if it is missing.
    pub async fn open(
        backend: Arc<dyn DocumentBackend>,
        index: impl Into<String>,
    ) -> ContactResult<Self> {
        let store = Self::new(backend, index);
        if !store.backend.index_exists(&store.index).await? {
            store.backend.create_index(&store.index).await?;
        }
        Ok(store)
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Drop the whole index with every contact in it.
    pub async fn clear(&self) -> ContactResult<()> {
        if self.backend.index_exists(&self.index).await? {
            self.backend.delete_index(&self.index).await?;
        }
        Ok(())
    }

    fn to_document(contact: &Contact) -> ContactResult<Value> {
        serde_json::to_value(contact).map_err(ContactError::Serialization)
    }

    fn from_document(document: Value) -> ContactResult<Contact> {
        serde_json::from_value(document)
            .map_err(|e| BackendError::InvalidDocument(e.to_string()).into())
    }

    /// Read a contact already known to exist.
    async fn fetch(&self, name: &str, message: &str) -> ContactResult<Contact> {
        match self.backend.get_document(&self.index, name).await? {
            Some(document) => Self::from_document(document),
            None => Err(ContactError::not_found(name, message)),
        }
    }
}

#[async_trait]
impl ContactStore for ElasticContactStore {
    async fn exists(&self, name: &str) -> ContactResult<bool> {
        // No contact can hold a name that is not a valid document id
        if Contact::check_name(name).is_err() {
            return Ok(false);
        }
        Ok(self.backend.document_exists(&self.index, name).await?)
    }

    async fn add(&self, contact: &Contact) -> ContactResult<()> {
        let name = contact.name();
        if self.exists(name).await? {
            return Err(ContactError::duplicate(
                name,
                "Cannot add due to existing contact with same identity",
            ));
        }

        let document = Self::to_document(contact)?;
        match self.backend.put_document(&self.index, name, &document).await? {
            WriteOutcome::Created => {
                tracing::info!("Added contact '{}'", name);
                Ok(())
            }
            other => Err(BackendError::UnexpectedResult {
                operation: "index",
                id: name.to_string(),
                result: other.to_string(),
            }
            .into()),
        }
    }

    async fn delete(&self, name: &str) -> ContactResult<()> {
        Contact::check_name(name)?;
        if !self.exists(name).await? {
            return Err(ContactError::not_found(
                name,
                "Cannot remove due to no matching contact",
            ));
        }

        match self.backend.delete_document(&self.index, name).await? {
            WriteOutcome::Deleted => {
                tracing::info!("Deleted contact '{}'", name);
                Ok(())
            }
            other => Err(BackendError::UnexpectedResult {
                operation: "delete",
                id: name.to_string(),
                result: other.to_string(),
            }
            .into()),
        }
    }

    async fn get(&self, name: &str) -> ContactResult<Contact> {
        const MISSING: &str = "Cannot retrieve due to no matching contact";
        Contact::check_name(name)?;
        if !self.exists(name).await? {
            return Err(ContactError::not_found(name, MISSING));
        }
        self.fetch(name, MISSING).await
    }

    async fn update(&self, contact: &Contact) -> ContactResult<Contact> {
        const MISSING: &str = "Cannot update due to no matching contact";
        let name = contact.name();
        if !self.exists(name).await? {
            return Err(ContactError::not_found(name, MISSING));
        }

        let previous = self.fetch(name, MISSING).await?;
        let document = Self::to_document(contact)?;
        match self.backend.put_document(&self.index, name, &document).await? {
            WriteOutcome::Updated | WriteOutcome::Noop => {
                tracing::info!("Updated contact '{}'", name);
                Ok(previous)
            }
            other => Err(BackendError::UnexpectedResult {
                operation: "update",
                id: name.to_string(),
                result: other.to_string(),
            }
            .into()),
        }
    }

    async fn search(
        &self,
        page: u32,
        page_size: u32,
        query: Option<&str>,
    ) -> ContactResult<Vec<Contact>> {
        if page == 0 {
            return Err(ContactError::InvalidArgument(format!(
                "Provided invalid page: {}",
                page
            )));
        }

        let size = u64::from(page_size);
        let from = u64::from(page - 1) * size;
        tracing::debug!(
            "Searching '{}' from {} size {} query {:?}",
            self.index,
            from,
            size,
            query
        );

        self.backend
            .search(&self.index, query, from, size)
            .await?
            .into_iter()
            .map(Self::from_document)
            .collect()
    }
}
