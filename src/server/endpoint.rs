//! Request boundary: runs route logic and turns any failure into an envelope.
//!
//! Nothing below this module knows about HTTP status codes. A [`Route`] returns
//! a [`ContactResult`]; an [`Endpoint`] owns the translation of the error
//! taxonomy into a status and a failure envelope.

use crate::error::{ContactError, ContactResult};
use crate::server::envelope::ResponseEnvelope;
use async_trait::async_trait;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Status and headers a route may adjust before its body is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub content_type: Option<String>,
}

impl Default for ResponseHead {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            content_type: None,
        }
    }
}

/// One unit of request-handling logic.
#[async_trait]
pub trait Route: Send + Sync {
    type Request: Send + 'static;

    async fn handle(
        &self,
        request: Self::Request,
        head: &mut ResponseHead,
    ) -> ContactResult<ResponseEnvelope>;
}

/// HTTP status for each error kind.
pub fn status_for(err: &ContactError) -> StatusCode {
    match err {
        ContactError::Validation(_) | ContactError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        ContactError::NotFound { .. } => StatusCode::NOT_FOUND,
        ContactError::Duplicate { .. } => StatusCode::CONFLICT,
        ContactError::Backend(_) | ContactError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Wraps a [`Route`]; never fails.
pub struct Endpoint<R> {
    route: R,
}

impl<R: Route> Endpoint<R> {
    pub fn new(route: R) -> Self {
        Self { route }
    }

    /// Run the route. The content type is set to JSON before the route runs,
    /// so a route may still override it.
    pub async fn handle(&self, request: R::Request, head: &mut ResponseHead) -> ResponseEnvelope {
        head.content_type = Some(JSON_CONTENT_TYPE.to_string());

        match self.route.handle(request, head).await {
            Ok(envelope) => envelope,
            Err(err) => Self::fail(&err, head),
        }
    }

    pub async fn respond(&self, request: R::Request) -> ApiResponse {
        let mut head = ResponseHead::default();
        let envelope = self.handle(request, &mut head).await;
        ApiResponse { head, envelope }
    }

    /// Answer a request that never reached the route, e.g. one whose path or
    /// query could not be decoded.
    pub fn reject(&self, err: ContactError) -> ApiResponse {
        let mut head = ResponseHead {
            content_type: Some(JSON_CONTENT_TYPE.to_string()),
            ..ResponseHead::default()
        };
        let envelope = Self::fail(&err, &mut head);
        ApiResponse { head, envelope }
    }

    fn fail(err: &ContactError, head: &mut ResponseHead) -> ResponseEnvelope {
        let status = status_for(err);
        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", status.as_u16(), err);
        } else {
            tracing::warn!("Request rejected ({}): {}", status.as_u16(), err);
        }
        head.status = status;
        ResponseEnvelope::failure(err)
    }
}

/// A finished response, ready for axum.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub head: ResponseHead,
    pub envelope: ResponseEnvelope,
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let body = match serde_json::to_vec(&self.envelope) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to encode response envelope: {}", e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        let mut response = (self.head.status, body).into_response();
        if let Some(content_type) = self.head.content_type {
            match HeaderValue::from_str(&content_type) {
                Ok(value) => {
                    response.headers_mut().insert(CONTENT_TYPE, value);
                }
                Err(_) => tracing::warn!("Ignoring invalid content type: {}", content_type),
            }
        }
        response
    }
}
