use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use candor_store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request fields, reported with field detail.
    #[error("{0}")]
    Validation(String),

    /// Registration attempted with an email that already exists.
    #[error("Email already exists")]
    DuplicateEmail,

    /// Login failed.  One message for unknown email and wrong password so
    /// the response never reveals which check failed.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No usable identity could be resolved from the bearer credential.
    #[error("Authentication required")]
    Unauthenticated,

    /// Valid credential, insufficient role.
    #[error("Admin role required")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("File too large: {size} bytes (max {max})")]
    FileTooLarge { size: usize, max: usize },

    #[error("Blob storage error: {0}")]
    BlobStorage(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::DuplicateEmail => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::FileTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            ApiError::BlobStorage(e) => {
                tracing::error!(error = %e, "blob storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Blob storage error".to_string(),
                )
            }
            ApiError::Store(StoreError::NotFound) => {
                (StatusCode::NOT_FOUND, "Record not found".to_string())
            }
            ApiError::Store(StoreError::DuplicateEmail) => {
                (StatusCode::BAD_REQUEST, "Email already exists".to_string())
            }
            ApiError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
