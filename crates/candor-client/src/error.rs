use thiserror::Error;

/// Errors produced by the API client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connection, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
