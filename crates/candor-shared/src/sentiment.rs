//! Sentiment labels attached to feedback text for administrative display.

use serde::{Deserialize, Serialize};

/// Coarse sentiment of a feedback message.
///
/// `Unknown` is the sentinel used when the external annotator could not be
/// reached or returned something unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Mixed,
    Unknown,
}

impl SentimentLabel {
    /// Parse an annotator response string, case-insensitively.
    ///
    /// Anything outside the four known labels collapses to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            "neutral" => Self::Neutral,
            "mixed" => Self::Mixed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
            Self::Mixed => "Mixed",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_labels() {
        assert_eq!(SentimentLabel::parse("Positive"), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::parse("negative"), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::parse(" NEUTRAL "), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::parse("mixed"), SentimentLabel::Mixed);
    }

    #[test]
    fn parse_garbage_is_unknown() {
        assert_eq!(SentimentLabel::parse(""), SentimentLabel::Unknown);
        assert_eq!(SentimentLabel::parse("angry"), SentimentLabel::Unknown);
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&SentimentLabel::Positive).unwrap();
        assert_eq!(json, "\"Positive\"");
        let back: SentimentLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SentimentLabel::Positive);
    }
}
