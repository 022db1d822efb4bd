//! Address Book Server - an HTTP contact book backed by an Elasticsearch document store.
//!
//! Contacts are identified by name and carry an address and a list of phone
//! numbers. Each contact is stored as one JSON document keyed by its name.
//!
//! # Architecture
//!
//! - **domain**: Validated value types (phone numbers) and validation errors
//! - **models**: The `Contact` record and its wire format
//! - **error**: Error taxonomy for the store, backend, and configuration
//! - **config**: Configuration management from environment variables
//! - **client**: HTTP client for the Elasticsearch REST API
//! - **metrics**: Request and document counters for the client
//! - **repositories**: The `ContactStore` contract and its Elasticsearch implementation
//! - **server**: Response envelope, error-to-status mapping, and axum routes

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod repositories;
pub mod server;

// Re-export commonly used types
pub use client::{AsyncElasticClient, DocumentBackend, ElasticClient, WriteOutcome};
pub use config::Config;
pub use domain::{Phone, PhoneCategory, ValidationError};
pub use error::{BackendError, ConfigError, ContactError};
pub use metrics::{Metrics, MetricsSnapshot, RequestTimer};
pub use models::Contact;
pub use repositories::{ContactStore, ElasticContactStore};
pub use server::{router, ResponseEnvelope};
