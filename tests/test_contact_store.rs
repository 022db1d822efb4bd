mod mocks;

use addressbook_server::client::{DocumentBackend, WriteOutcome};
use addressbook_server::error::{BackendError, ContactError};
use addressbook_server::models::Contact;
use addressbook_server::repositories::{ContactStore, ElasticContactStore};
use addressbook_server::{Phone, PhoneCategory};
use mocks::MockDocumentBackend;
use serde_json::json;
use std::sync::Arc;

const INDEX: &str = "book";

fn store_over(backend: &MockDocumentBackend) -> ElasticContactStore {
    ElasticContactStore::new(Arc::new(backend.clone()) as Arc<dyn DocumentBackend>, INDEX)
}

fn contact(name: &str, address: &str) -> Contact {
    Contact::new(name, Vec::new(), address).unwrap()
}

#[tokio::test]
async fn test_add_exists_duplicate_delete_scenario() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);
    let bob = contact("Bob", "Earth");

    store.add(&bob).await.unwrap();
    assert!(store.exists("Bob").await.unwrap());

    let err = store.add(&bob).await.unwrap_err();
    assert!(matches!(err, ContactError::Duplicate { .. }));
    assert_eq!(err.identity(), Some("Bob"));
    assert_eq!(
        err.to_string(),
        "Cannot add due to existing contact with same identity"
    );
    assert_eq!(backend.get_call_count("put_document"), 1);

    store.delete("Bob").await.unwrap();
    assert!(!store.exists("Bob").await.unwrap());
}

#[tokio::test]
async fn test_stored_document_matches_wire_format() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);
    let ann = Contact::new(
        "Ann",
        vec![Phone::new("2345678901", PhoneCategory::Home).unwrap()],
        "Moon",
    )
    .unwrap();

    store.add(&ann).await.unwrap();

    assert_eq!(
        backend.document(INDEX, "Ann").unwrap(),
        json!({
            "name": "Ann",
            "address": "Moon",
            "numbers": [{ "number": "234-567-8901", "type": "HOME" }]
        })
    );
}

#[tokio::test]
async fn test_get_roundtrips_full_record() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);
    let phones = vec![
        Phone::new("777-222-4444", PhoneCategory::Home).unwrap(),
        Phone::new("444-111-2222", PhoneCategory::Mobile).unwrap(),
    ];
    let matt = Contact::new("Matt", phones.clone(), "Earth").unwrap();

    store.add(&matt).await.unwrap();
    backend.reset_call_counts();

    let fetched = store.get("Matt").await.unwrap();
    assert_eq!(fetched, matt);
    assert_eq!(fetched.address(), "Earth");
    assert_eq!(fetched.phones(), phones.as_slice());

    // One existence check, one read
    assert_eq!(backend.get_call_count("document_exists"), 1);
    assert_eq!(backend.get_call_count("get_document"), 1);
}

#[tokio::test]
async fn test_delete_then_get_not_found() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);

    store.add(&contact("Bob", "Earth")).await.unwrap();
    store.delete("Bob").await.unwrap();

    let err = store.get("Bob").await.unwrap_err();
    assert!(matches!(err, ContactError::NotFound { .. }));
    assert_eq!(err.to_string(), "Cannot retrieve due to no matching contact");
    assert_eq!(err.identity(), Some("Bob"));
}

#[tokio::test]
async fn test_delete_missing_does_not_touch_backend() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);

    let err = store.delete("Nobody").await.unwrap_err();
    assert_eq!(err.to_string(), "Cannot remove due to no matching contact");
    assert_eq!(backend.get_call_count("delete_document"), 0);
}

#[tokio::test]
async fn test_update_returns_previous_record() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);

    store.add(&contact("Bob", "Earth")).await.unwrap();
    let replacement = Contact::new(
        "Bob",
        vec![Phone::new("333-444-5555", PhoneCategory::Mobile).unwrap()],
        "Mars",
    )
    .unwrap();

    let previous = store.update(&replacement).await.unwrap();
    assert_eq!(previous.address(), "Earth");
    assert!(previous.phones().is_empty());

    let current = store.get("Bob").await.unwrap();
    assert_eq!(current.address(), "Mars");
    assert_eq!(current.phones(), replacement.phones());
}

#[tokio::test]
async fn test_update_missing_not_found() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);

    let err = store.update(&contact("Ghost", "Nowhere")).await.unwrap_err();
    assert!(matches!(err, ContactError::NotFound { .. }));
    assert_eq!(err.to_string(), "Cannot update due to no matching contact");
    assert_eq!(backend.get_call_count("put_document"), 0);
    assert!(backend.document(INDEX, "Ghost").is_none());
}

#[tokio::test]
async fn test_search_rejects_page_zero() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);

    for (page_size, query) in [(10, None), (0, Some("Bob")), (u32::MAX, Some("*"))] {
        let err = store.search(0, page_size, query).await.unwrap_err();
        assert!(matches!(err, ContactError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "Provided invalid page: 0");
    }
    assert_eq!(backend.get_call_count("search"), 0);
}

#[tokio::test]
async fn test_search_pages_in_backend_order() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);
    for name in ["A", "B", "C", "D", "E"] {
        store.add(&contact(name, "Earth")).await.unwrap();
    }

    let names = |contacts: Vec<Contact>| {
        contacts
            .iter()
            .map(|c| c.name().to_string())
            .collect::<Vec<_>>()
    };

    assert_eq!(names(store.search(1, 2, None).await.unwrap()), ["A", "B"]);
    assert_eq!(names(store.search(2, 2, None).await.unwrap()), ["C", "D"]);
    assert_eq!(names(store.search(3, 2, None).await.unwrap()), ["E"]);
    assert!(store.search(4, 2, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_passes_query_through() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);
    store.add(&contact("Bob", "Earth")).await.unwrap();
    store.add(&contact("Ann", "Mars")).await.unwrap();

    let found = store.search(1, 10, Some("mars")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name(), "Ann");
}

#[tokio::test]
async fn test_backend_failure_preserves_diagnostics() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);
    backend.fail_with("cluster_block_exception");

    let err = store.get("Bob").await.unwrap_err();
    assert_eq!(err.kind(), "BackendError");
    assert!(err.to_string().contains("cluster_block_exception"));
}

#[tokio::test]
async fn test_unexpected_write_result_is_backend_error() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);
    backend.force_put_outcome(WriteOutcome::Updated);

    let err = store.add(&contact("Bob", "Earth")).await.unwrap_err();
    assert!(matches!(
        err,
        ContactError::Backend(BackendError::UnexpectedResult { .. })
    ));
    assert_eq!(err.to_string(), "Failed to index: Bob - updated");
}

#[tokio::test]
async fn test_update_accepts_noop() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);
    store.add(&contact("Bob", "Earth")).await.unwrap();
    backend.force_put_outcome(WriteOutcome::Noop);

    let previous = store.update(&contact("Bob", "Earth")).await.unwrap();
    assert_eq!(previous.address(), "Earth");
}

#[tokio::test]
async fn test_corrupt_stored_document() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);
    backend.insert_raw(INDEX, "Bad", json!({ "name": "Bad", "numbers": [] }));

    let err = store.get("Bad").await.unwrap_err();
    assert!(matches!(
        err,
        ContactError::Backend(BackendError::InvalidDocument(_))
    ));
}

#[tokio::test]
async fn test_open_creates_missing_index() {
    let backend = MockDocumentBackend::new();
    let shared = Arc::new(backend.clone()) as Arc<dyn DocumentBackend>;

    let store = ElasticContactStore::open(shared.clone(), INDEX).await.unwrap();
    assert_eq!(store.index(), INDEX);
    assert!(backend.has_index(INDEX));
    assert_eq!(backend.get_call_count("create_index"), 1);

    ElasticContactStore::open(shared, INDEX).await.unwrap();
    assert_eq!(backend.get_call_count("create_index"), 1);
}

#[tokio::test]
async fn test_clear_drops_index() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);
    store.add(&contact("Bob", "Earth")).await.unwrap();

    store.clear().await.unwrap();
    assert!(!backend.has_index(INDEX));

    // Clearing twice is harmless
    store.clear().await.unwrap();
    assert_eq!(backend.get_call_count("delete_index"), 1);
}

#[tokio::test]
async fn test_dot_segment_names_never_reach_backend() {
    let backend = MockDocumentBackend::with_index(INDEX);
    let store = store_over(&backend);
    store.add(&contact("Bob", "Earth")).await.unwrap();
    backend.reset_call_counts();

    for name in [".", ".."] {
        assert!(!store.exists(name).await.unwrap());

        let err = store.get(name).await.unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
        assert_eq!(err.to_string(), format!("Invalid contact name: {}", name));

        let err = store.delete(name).await.unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
    }
    assert_eq!(backend.get_call_count("document_exists"), 0);
    assert_eq!(backend.get_call_count("delete_document"), 0);
    assert!(store.exists("Bob").await.unwrap());
}
