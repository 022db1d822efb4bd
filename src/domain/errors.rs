//! Domain validation errors.

use std::fmt;

/// Errors that can occur while constructing domain values or reading request input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required value was not provided. Holds a description of the value.
    Missing(&'static str),

    /// The provided phone number is not in an accepted format.
    InvalidPhone(String),

    /// The provided phone type is not one of the known categories.
    InvalidPhoneType(String),

    /// The request body could not be parsed as JSON of the expected shape.
    MalformedJson(String),

    /// A request parameter was present but could not be interpreted.
    InvalidParameter { name: &'static str, value: String },

    /// The name cannot identify a stored document (`.` or `..`).
    InvalidName(String),

    /// The request path or query string could not be decoded.
    MalformedRequest(String),
}

impl ValidationError {
    /// Whether this error was caused by an absent value.
    #[cfg(test)]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(what) => write!(f, "Must specify {}", what),
            Self::InvalidPhone(number) => write!(f, "Invalid phone format: {}", number),
            Self::InvalidPhoneType(kind) => write!(f, "Invalid phone type: {}", kind),
            Self::MalformedJson(detail) => write!(f, "Malformed JSON: {}", detail),
            Self::InvalidParameter { name, value } => {
                write!(f, "Invalid {} parameter: {}", name, value)
            }
            Self::InvalidName(name) => write!(f, "Invalid contact name: {}", name),
            Self::MalformedRequest(detail) => write!(f, "Malformed request: {}", detail),
        }
    }
}

impl std::error::Error for ValidationError {}
