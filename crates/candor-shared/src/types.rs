//! Wire-level feedback records exchanged between server and clients.
//!
//! Field names serialize in `camelCase` to match what the web frontend
//! consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sentiment::SentimentLabel;

/// A feedback row as returned by the personal feed.  Deliberately carries
/// no id or owner fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnFeedback {
    pub heading: String,
    pub category: String,
    pub subcategory: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
    pub image_url: Option<String>,
}

/// A feedback row in the administrative feed, joined with its owner and
/// enriched with a sentiment label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminFeedbackRecord {
    pub id: i64,
    pub heading: String,
    pub category: String,
    pub subcategory: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub full_name: String,
    pub email: String,
    pub sentiment: SentimentLabel,
}

/// A feedback row nested under its owner in the users-with-feedbacks view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub id: i64,
    pub heading: String,
    pub category: String,
    pub subcategory: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

/// A user paired with their feedback list, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithFeedbacks {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub feedbacks: Vec<FeedbackEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_record_uses_camel_case() {
        let record = AdminFeedbackRecord {
            id: 1,
            heading: "h".into(),
            category: "Services".into(),
            subcategory: "Transportation".into(),
            message: "m".into(),
            submitted_at: Utc::now(),
            image_url: None,
            full_name: "Ana Ruiz".into(),
            email: "ana@example.com".into(),
            sentiment: SentimentLabel::Neutral,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("fullName").is_some());
        assert!(json.get("submittedAt").is_some());
        assert!(json.get("imageUrl").is_some());
        assert_eq!(json["sentiment"], "Neutral");
    }
}
