//! Password hashing and bearer-credential resolution.
//!
//! Passwords are stored as argon2id PHC strings.  Bearer tokens are the
//! Ed25519-signed envelopes from `candor_shared::token`; this module only
//! extracts and checks them against the server's verifying key.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use ed25519_dalek::VerifyingKey;

use candor_shared::token::decode_token;
use candor_shared::AuthClaims;

use crate::api::AppState;
use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Passwords
// ---------------------------------------------------------------------------

/// Hash a plaintext password into an argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Check a plaintext password against a stored PHC string.
///
/// An unparseable stored hash counts as a mismatch rather than an error;
/// the login flow reports one uniform failure either way.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// ---------------------------------------------------------------------------
// Bearer credentials
// ---------------------------------------------------------------------------

/// Pull the token out of an `Authorization: Bearer` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth = headers.get("authorization")?.to_str().ok()?;
    auth.strip_prefix("Bearer ")
}

/// Resolve the caller's identity from the request headers.
///
/// Missing header, malformed token, bad signature, and expired claims all
/// collapse to [`ApiError::Unauthenticated`].
pub fn resolve_claims(
    headers: &HeaderMap,
    verifying_key: &VerifyingKey,
) -> Result<AuthClaims, ApiError> {
    bearer_token(headers)
        .and_then(|token| decode_token(token, verifying_key))
        .ok_or(ApiError::Unauthenticated)
}

/// Middleware gating the `/admin` subrouter.
///
/// Runs before any admin handler body: 401 without a valid credential,
/// 403 for a valid credential without the admin role.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = resolve_claims(req.headers(), &state.verifying_key)?;
    if !claims.role.is_admin() {
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(req).await)
}
