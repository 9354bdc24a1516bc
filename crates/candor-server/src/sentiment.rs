//! Client for the external sentiment annotator.
//!
//! The annotator is a best-effort dependency: [`SentimentClient::analyze`]
//! never fails.  Any fault — unconfigured endpoint, network error, bad
//! status, unparseable body — degrades to [`SentimentLabel::Unknown`]
//! instead of propagating.  A single bad annotation must not take down the
//! administrative feed.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use candor_shared::SentimentLabel;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    sentiment: String,
}

/// Thin reqwest wrapper around the annotator endpoint.
#[derive(Debug, Clone)]
pub struct SentimentClient {
    http: reqwest::Client,
    endpoint: Option<String>,
    key: String,
}

impl SentimentClient {
    /// Create a client from explicit configuration.  A `None` endpoint
    /// produces a client that labels everything `Unknown`.
    pub fn new(endpoint: Option<String>, key: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http,
            endpoint,
            key,
        }
    }

    /// Annotate one piece of feedback text.
    pub async fn analyze(&self, text: &str) -> SentimentLabel {
        let Some(endpoint) = &self.endpoint else {
            return SentimentLabel::Unknown;
        };

        match self.request(endpoint, text).await {
            Ok(label) => label,
            Err(e) => {
                debug!(error = %e, "sentiment annotation failed, degrading to Unknown");
                SentimentLabel::Unknown
            }
        }
    }

    async fn request(&self, endpoint: &str, text: &str) -> Result<SentimentLabel, reqwest::Error> {
        let response = self
            .http
            .post(format!("{endpoint}/analyze"))
            .header("api-key", &self.key)
            .json(&AnalyzeRequest { text })
            .send()
            .await?
            .error_for_status()?;

        let body: AnalyzeResponse = response.json().await?;
        Ok(SentimentLabel::parse(&body.sentiment))
    }
}
