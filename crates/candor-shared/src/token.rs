//! Signed bearer tokens.
//!
//! A token is a JSON envelope `{ claims, signature }` encoded as URL-safe
//! base64.  The signature is an Ed25519 signature over the serialized
//! claims, produced by the server's signing key.  Clients treat the token
//! as opaque and replay it in the `Authorization: Bearer` header.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

/// Token lifetime.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// The role claim gating admin-only endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn from_is_admin(is_admin: bool) -> Self {
        if is_admin {
            Self::Admin
        } else {
            Self::User
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Identity and role claims embedded in a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthClaims {
    pub user_id: i64,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl AuthClaims {
    /// Build claims for a freshly authenticated user, expiring in
    /// [`TOKEN_TTL_HOURS`].
    pub fn new(user_id: i64, email: &str, full_name: &str, is_admin: bool) -> Self {
        Self {
            user_id,
            email: email.to_string(),
            full_name: full_name.to_string(),
            role: Role::from_is_admin(is_admin),
            expires_at: Utc::now() + Duration::hours(TOKEN_TTL_HOURS),
        }
    }
}

/// Wire envelope: claims plus the signature over their serialized form.
#[derive(Debug, Serialize, Deserialize)]
struct TokenEnvelope {
    claims: AuthClaims,
    signature: Vec<u8>,
}

/// Sign `claims` and encode the token for use as a bearer credential.
pub fn issue_token(claims: &AuthClaims, signing_key: &SigningKey) -> String {
    // Serializing a struct is deterministic (field order is fixed), so the
    // verifier can reproduce the exact payload bytes.
    let payload = serde_json::to_vec(claims).expect("claims serialize");
    let signature = signing_key.sign(&payload);

    let envelope = TokenEnvelope {
        claims: claims.clone(),
        signature: signature.to_bytes().to_vec(),
    };
    let bytes = serde_json::to_vec(&envelope).expect("envelope serialize");
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode and verify a bearer token.
///
/// Returns `None` for anything that should not be trusted: malformed
/// encoding, a bad signature, or expired claims.
pub fn decode_token(token: &str, verifying_key: &VerifyingKey) -> Option<AuthClaims> {
    let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
    let envelope: TokenEnvelope = serde_json::from_slice(&bytes).ok()?;

    if Utc::now() > envelope.claims.expires_at {
        return None;
    }

    let payload = serde_json::to_vec(&envelope.claims).ok()?;
    let signature = Signature::from_slice(&envelope.signature).ok()?;

    verifying_key.verify(&payload, &signature).ok()?;
    Some(envelope.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn test_key() -> SigningKey {
        SigningKey::generate(&mut OsRng)
    }

    #[test]
    fn token_round_trip() {
        let key = test_key();
        let claims = AuthClaims::new(7, "ana@example.com", "Ana Ruiz", true);

        let token = issue_token(&claims, &key);
        let decoded = decode_token(&token, &key.verifying_key()).expect("valid token");

        assert_eq!(decoded, claims);
        assert!(decoded.role.is_admin());
    }

    #[test]
    fn expired_token_rejected() {
        let key = test_key();
        let mut claims = AuthClaims::new(1, "a@b.c", "A", false);
        claims.expires_at = Utc::now() - Duration::hours(1);

        let token = issue_token(&claims, &key);
        assert!(decode_token(&token, &key.verifying_key()).is_none());
    }

    #[test]
    fn wrong_key_rejected() {
        let key = test_key();
        let other = test_key();
        let claims = AuthClaims::new(1, "a@b.c", "A", false);

        let token = issue_token(&claims, &key);
        assert!(decode_token(&token, &other.verifying_key()).is_none());
    }

    #[test]
    fn tampered_claims_rejected() {
        let key = test_key();
        let claims = AuthClaims::new(1, "a@b.c", "A", false);
        let token = issue_token(&claims, &key);

        // Re-encode the envelope with the role claim flipped to Admin.
        let bytes = URL_SAFE_NO_PAD.decode(&token).unwrap();
        let mut envelope: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        envelope["claims"]["role"] = serde_json::json!("Admin");
        let forged = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&envelope).unwrap());

        assert!(decode_token(&forged, &key.verifying_key()).is_none());
    }

    #[test]
    fn garbage_rejected() {
        let key = test_key();
        assert!(decode_token("not-a-token", &key.verifying_key()).is_none());
        assert!(decode_token("", &key.verifying_key()).is_none());
    }
}
