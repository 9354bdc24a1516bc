//! # candor-server
//!
//! REST API for the Candor feedback portal.
//!
//! This binary provides:
//! - **Registration and login** with argon2 password hashing and
//!   Ed25519-signed bearer tokens
//! - **Feedback submission and personal feeds** for authenticated users
//! - **Image uploads** stored in a disk-backed blob container and served
//!   back over HTTP
//! - **Administrative endpoints** (role-gated) for reviewing, deleting,
//!   and browsing feedback, enriched with best-effort sentiment labels
//!   from an external annotator

mod api;
mod auth;
mod blob_store;
mod config;
mod error;
mod sentiment;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use candor_store::Database;

use crate::api::AppState;
use crate::blob_store::BlobStore;
use crate::config::ServerConfig;
use crate::sentiment::SentimentClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,candor_server=debug")),
        )
        .init();

    info!("Starting Candor server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(
        addr = %config.http_addr,
        database = %config.database_path.display(),
        container = %config.blob_container,
        sentiment_configured = config.sentiment_endpoint.is_some(),
        "Loaded configuration"
    );

    // -----------------------------------------------------------------------
    // 3. Initialize subsystems
    // -----------------------------------------------------------------------

    // SQLite store (migrations run on open)
    let db = Database::open_at(&config.database_path)?;

    // Blob store for uploaded images (creates the container if missing)
    let blob_store = BlobStore::new(
        config.blob_storage_path.clone(),
        config.blob_container.clone(),
        config.public_base_url.clone(),
        config.max_upload_size,
    )
    .await?;

    // Best-effort sentiment annotator
    let sentiment = SentimentClient::new(
        config.sentiment_endpoint.clone(),
        config.sentiment_key.clone(),
    );

    // Token signing keypair
    let signing_key = config.signing_key();
    let verifying_key = signing_key.verifying_key();

    let state = AppState {
        db: Arc::new(Mutex::new(db)),
        blob_store: Arc::new(blob_store),
        sentiment: Arc::new(sentiment),
        config: Arc::new(config.clone()),
        signing_key: Arc::new(signing_key),
        verifying_key,
    };

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(state, config.http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
