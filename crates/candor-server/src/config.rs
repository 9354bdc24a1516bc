//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.  Config objects are passed into
//! each service at construction time; there is no global singleton.

use std::net::SocketAddr;
use std::path::PathBuf;

use ed25519_dalek::SigningKey;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Filesystem path of the SQLite database.
    /// Env: `DATABASE_PATH`
    /// Default: `./candor.db`
    pub database_path: PathBuf,

    /// Filesystem path where uploaded images are stored.
    /// Env: `BLOB_STORAGE_PATH`
    /// Default: `./blobs`
    pub blob_storage_path: PathBuf,

    /// Container (sub-directory and URL segment) for feedback images.
    /// Env: `BLOB_CONTAINER`
    /// Default: `feedback-images`
    pub blob_container: String,

    /// Base URL under which stored images are retrievable.
    /// Env: `PUBLIC_BASE_URL`
    /// Default: `http://localhost:8080`
    pub public_base_url: String,

    /// Maximum accepted upload size in bytes (10 MiB).
    pub max_upload_size: usize,

    /// Ed25519 seed for the token signing key (hex-encoded, 64 chars).
    /// Env: `TOKEN_KEY`
    /// Default: unset; an ephemeral key is generated at startup.
    pub token_key: Option<[u8; 32]>,

    /// Base URL of the external sentiment annotator.
    /// Env: `SENTIMENT_ENDPOINT`
    /// Default: unset; every annotation degrades to `Unknown`.
    pub sentiment_endpoint: Option<String>,

    /// API key for the sentiment annotator.
    /// Env: `SENTIMENT_KEY`
    /// Default: empty.
    pub sentiment_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], 8080).into(),
            database_path: PathBuf::from("./candor.db"),
            blob_storage_path: PathBuf::from("./blobs"),
            blob_container: "feedback-images".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            max_upload_size: 10 * 1024 * 1024, // 10 MiB
            token_key: None,
            sentiment_endpoint: None,
            sentiment_key: String::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(
                    value = %addr,
                    "Invalid HTTP_ADDR, using default"
                );
            }
        }

        if let Ok(path) = std::env::var("DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("BLOB_STORAGE_PATH") {
            config.blob_storage_path = PathBuf::from(path);
        }

        if let Ok(container) = std::env::var("BLOB_CONTAINER") {
            if !container.is_empty() {
                config.blob_container = container;
            }
        }

        if let Ok(url) = std::env::var("PUBLIC_BASE_URL") {
            config.public_base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(hex_key) = std::env::var("TOKEN_KEY") {
            match parse_hex_key(&hex_key) {
                Ok(key) => config.token_key = Some(key),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Invalid TOKEN_KEY, falling back to an ephemeral key"
                    );
                }
            }
        }

        if let Ok(endpoint) = std::env::var("SENTIMENT_ENDPOINT") {
            if !endpoint.is_empty() {
                config.sentiment_endpoint = Some(endpoint.trim_end_matches('/').to_string());
            }
        }

        if let Ok(key) = std::env::var("SENTIMENT_KEY") {
            config.sentiment_key = key;
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }

    /// The Ed25519 key used to sign bearer tokens.
    ///
    /// Without a configured `TOKEN_KEY` an ephemeral key is generated, so
    /// issued tokens stop verifying after a restart.
    pub fn signing_key(&self) -> SigningKey {
        match self.token_key {
            Some(seed) => SigningKey::from_bytes(&seed),
            None => {
                tracing::warn!(
                    "TOKEN_KEY not set, using an ephemeral signing key \
                     (issued tokens will not survive a restart)"
                );
                SigningKey::generate(&mut rand::rngs::OsRng)
            }
        }
    }
}

/// Parse a 64-character hex string into a 32-byte array.
fn parse_hex_key(hex: &str) -> Result<[u8; 32], String> {
    let hex = hex.trim();
    if hex.len() != 64 {
        return Err(format!("expected 64 hex chars, got {}", hex.len()));
    }

    let bytes = hex::decode(hex).map_err(|e| e.to_string())?;
    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes);
    Ok(key)
}
