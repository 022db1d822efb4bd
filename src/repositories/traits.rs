use crate::error::ContactResult;
use crate::models::Contact;
use async_trait::async_trait;

/// Store of contacts keyed by name.
///
/// Provides abstraction over contact persistence, enabling different
/// implementations (document store, in-memory).
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Whether a contact with this name is stored.
    async fn exists(&self, name: &str) -> ContactResult<bool>;

    /// Store a new contact. Fails with `Duplicate` if the name is taken.
    async fn add(&self, contact: &Contact) -> ContactResult<()>;

    /// Remove a contact. Fails with `NotFound` if there is none.
    async fn delete(&self, name: &str) -> ContactResult<()>;

    /// Retrieve a contact by name.
    async fn get(&self, name: &str) -> ContactResult<Contact>;

    /// Replace the stored record with `contact` and return the previous one.
    async fn update(&self, contact: &Contact) -> ContactResult<Contact>;

    /// Fetch one 1-based page of contacts, optionally filtered by a free-text query.
    async fn search(
        &self,
        page: u32,
        page_size: u32,
        query: Option<&str>,
    ) -> ContactResult<Vec<Contact>>;
}
