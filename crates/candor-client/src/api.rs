//! HTTP client for the Candor REST API.
//!
//! One method per endpoint.  A successful login remembers the bearer token
//! so subsequent authenticated calls just work.

use serde::{Deserialize, Serialize};
use tracing::debug;

use candor_shared::{AdminFeedbackRecord, OwnFeedback, UserWithFeedbacks};

use crate::error::{ClientError, Result};

/// Registration payload.  The `passwordHash` wire field carries the
/// plaintext password; hashing happens server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    #[serde(rename = "passwordHash")]
    pub password: String,
    pub gender: String,
    pub is_admin: bool,
}

/// Feedback submission payload.  The optional image URL comes from a
/// prior [`ApiClient::upload_image`] call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub heading: String,
    pub category: String,
    pub subcategory: String,
    pub message: String,
    pub image: Option<String>,
}

/// What a successful login returns.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSession {
    pub token: String,
    pub is_admin: bool,
    pub full_name: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    image_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for one Candor server instance.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// The remembered bearer token, if logged in.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replace the bearer token (e.g. one restored from storage).
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Map a non-success response to [`ClientError::Api`] with the
    /// server's error message.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| "request failed".to_string());

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Log in and remember the returned bearer token.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginSession> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let session: LoginSession = Self::check(response).await?.json().await?;

        debug!(user = %session.full_name, "logged in");
        self.token = Some(session.token.clone());
        Ok(session)
    }

    // ------------------------------------------------------------------
    // Feedback
    // ------------------------------------------------------------------

    pub async fn submit_feedback(&self, submission: &FeedbackSubmission) -> Result<()> {
        let response = self
            .with_auth(self.http.post(self.url("/feedback/submit")))
            .json(submission)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn my_feedbacks(&self) -> Result<Vec<OwnFeedback>> {
        let response = self
            .with_auth(self.http.get(self.url("/feedback/my-feedbacks")))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Upload an image and return its retrievable URL for a later
    /// [`submit_feedback`] call.
    ///
    /// [`submit_feedback`]: ApiClient::submit_feedback
    pub async fn upload_image(&self, file_name: &str, data: Vec<u8>) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(data).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .with_auth(self.http.post(self.url("/feedback/upload-image")))
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = Self::check(response).await?.json().await?;
        Ok(body.image_url)
    }

    // ------------------------------------------------------------------
    // Admin
    // ------------------------------------------------------------------

    pub async fn all_feedbacks(&self) -> Result<Vec<AdminFeedbackRecord>> {
        let response = self
            .with_auth(self.http.get(self.url("/admin/all-feedbacks")))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn delete_feedback(&self, id: i64) -> Result<()> {
        let response = self
            .with_auth(
                self.http
                    .delete(self.url(&format!("/admin/delete-feedback/{id}"))),
            )
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn users_with_feedbacks(&self) -> Result<Vec<UserWithFeedbacks>> {
        let response = self
            .with_auth(self.http.get(self.url("/admin/users-with-feedbacks")))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
