//! HTTP server for the address book.
//!
//! This module exposes the contact store over HTTP. Every response body is a
//! [`ResponseEnvelope`] and carries a JSON content type.

pub mod endpoint;
pub mod envelope;
pub mod routes;

pub use endpoint::{status_for, ApiResponse, Endpoint, ResponseHead, Route};
pub use envelope::{FailCause, ResponseEnvelope};
pub use routes::{router, ContactEndpoints};

use crate::repositories::ContactStore;
use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serve the contact routes on `listener` until Ctrl-C is received.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn run_server(listener: TcpListener, store: Arc<dyn ContactStore>) -> Result<()> {
    let app = router(store);

    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on http://{}", addr);
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
    }
}
