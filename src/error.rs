//! Error types for the address book server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use crate::domain::ValidationError;
use thiserror::Error;

/// Errors that can occur when talking to the document store.
#[derive(Error, Debug)]
pub enum BackendError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Document store returned an error status code
    #[error("Document store error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse or encode JSON
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// The store answered, but not with the result the operation requires
    #[error("Failed to {operation}: {id} - {result}")]
    UnexpectedResult {
        operation: &'static str,
        id: String,
        result: String,
    },

    /// A stored document could not be read back as a contact
    #[error("Invalid stored document: {0}")]
    InvalidDocument(String),
}

/// Errors produced by contact store operations and request handling.
///
/// Each variant maps to one kind in the failure envelope; see [`ContactError::kind`].
#[derive(Error, Debug)]
pub enum ContactError {
    /// Caller supplied missing or malformed input
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced contact does not exist
    #[error("{message}")]
    NotFound { name: String, message: String },

    /// A contact with the same identity already exists
    #[error("{message}")]
    Duplicate { name: String, message: String },

    /// The document store failed
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// An operational parameter is out of range
    #[error("{0}")]
    InvalidArgument(String),

    /// A response payload could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ContactError {
    pub fn not_found(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn duplicate(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Duplicate {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Stable kind name reported as the failure type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::NotFound { .. } => "NotFoundError",
            Self::Duplicate { .. } => "DuplicateError",
            Self::Backend(_) => "BackendError",
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::Serialization(_) => "SerializationError",
        }
    }

    /// Identity of the contact the error refers to, if any.
    pub fn identity(&self) -> Option<&str> {
        match self {
            Self::NotFound { name, .. } | Self::Duplicate { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Other(String),
}

/// Convenience type alias for Results with BackendError
pub type BackendResult<T> = Result<T, BackendError>;

/// Convenience type alias for Results with ContactError
pub type ContactResult<T> = Result<T, ContactError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
