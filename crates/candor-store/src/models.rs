//! Domain model structs persisted in the SQLite database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Row id, assigned by SQLite.
    pub id: i64,
    pub full_name: String,
    /// Unique across all users.
    pub email: String,
    /// Argon2 PHC hash string, never the plaintext.
    pub password_hash: String,
    /// Free-text, as entered at registration.
    pub gender: String,
    pub is_admin: bool,
    /// Optional profile image URL.
    pub image: Option<String>,
}

/// Fields supplied when registering a user; the id is assigned on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub gender: String,
    pub is_admin: bool,
    pub image: Option<String>,
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// A single submitted feedback record.  Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feedback {
    /// Row id, assigned by SQLite.
    pub id: i64,
    pub heading: String,
    pub category: String,
    pub subcategory: String,
    pub message: String,
    /// Server-assigned submission time.
    pub submitted_at: DateTime<Utc>,
    /// Owning user; never null for rows created through the submission flow.
    pub user_id: i64,
    /// Optional attached image URL.
    pub image: Option<String>,
}

/// Fields supplied at submission; id comes from SQLite, the timestamp from
/// the server clock at insert time.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub heading: String,
    pub category: String,
    pub subcategory: String,
    pub message: String,
    pub user_id: i64,
    pub image: Option<String>,
}

/// A feedback row joined with its owner's display fields, for the
/// administrative feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackWithOwner {
    pub feedback: Feedback,
    pub full_name: String,
    pub email: String,
}
