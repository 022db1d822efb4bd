//! Uniform success/failure wrapper for every HTTP response body.

use crate::error::{ContactError, ContactResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured description of a failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailCause {
    #[serde(rename = "type")]
    pub kind: String,

    pub message: String,

    /// Name of the contact the failure refers to, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
}

impl From<&ContactError> for FailCause {
    fn from(err: &ContactError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
            identity: err.identity().map(str::to_string),
        }
    }
}

/// Response body: `{"success": .., "failCause": .., "data": ..}`.
///
/// A failed envelope never carries data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub success: bool,
    pub fail_cause: Option<FailCause>,
    pub data: Option<Value>,
}

impl ResponseEnvelope {
    /// Successful response carrying `payload`.
    pub fn success<T: Serialize>(payload: &T) -> ContactResult<Self> {
        let data = serde_json::to_value(payload).map_err(ContactError::Serialization)?;
        Ok(Self {
            success: true,
            fail_cause: None,
            data: Some(data),
        })
    }

    /// Successful response with no payload.
    pub fn empty() -> Self {
        Self {
            success: true,
            fail_cause: None,
            data: None,
        }
    }

    pub fn failure(err: &ContactError) -> Self {
        Self {
            success: false,
            fail_cause: Some(FailCause::from(err)),
            data: None,
        }
    }
}
