//! Address Book Server - Main entry point
//!
//! Serves the contact book over HTTP, storing one document per contact in an
//! Elasticsearch index.

use addressbook_server::client::{AsyncElasticClient, DocumentBackend};
use addressbook_server::repositories::{ContactStore, ElasticContactStore};
use addressbook_server::{Config, ElasticClient};
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // RUST_LOG wins over LOG_LEVEL when both are set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting Address Book Server with Elasticsearch {} at {} (index '{}')",
        config.elastic_version, config.elastic_url, config.index
    );

    // Initialize document store client
    let sync_client = ElasticClient::new(&config);
    let metrics = sync_client.metrics().clone();
    let backend = Arc::new(AsyncElasticClient::new(sync_client)) as Arc<dyn DocumentBackend>;

    let store = match ElasticContactStore::open(backend, config.index.clone()).await {
        Ok(store) => Arc::new(store) as Arc<dyn ContactStore>,
        Err(e) => {
            error!("Failed to open index '{}': {}", config.index, e);
            return Err(e.into());
        }
    };

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    addressbook_server::server::run_server(listener, store).await?;

    info!("Backend traffic: {}", metrics.snapshot());
    info!("Address Book Server shutdown complete");
    Ok(())
}
