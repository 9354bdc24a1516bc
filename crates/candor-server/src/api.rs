//! HTTP API surface: router, application state, and all handlers.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{HeaderMap, Method},
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use ed25519_dalek::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use candor_shared::token::issue_token;
use candor_shared::{AdminFeedbackRecord, AuthClaims, FeedbackEntry, OwnFeedback, UserWithFeedbacks};
use candor_store::{Database, NewFeedback, NewUser, StoreError};

use crate::auth;
use crate::blob_store::BlobStore;
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::sentiment::SentimentClient;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub blob_store: Arc<BlobStore>,
    pub sentiment: Arc<SentimentClient>,
    pub config: Arc<ServerConfig>,
    pub signing_key: Arc<SigningKey>,
    pub verifying_key: VerifyingKey,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    // The admin role check runs as middleware, before any handler body.
    let admin = Router::new()
        .route("/all-feedbacks", get(all_feedbacks))
        .route("/delete-feedback/{id}", delete(delete_feedback))
        .route("/users-with-feedbacks", get(users_with_feedbacks))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/feedback/submit", post(submit_feedback))
        .route("/feedback/my-feedbacks", get(my_feedbacks))
        .route("/feedback/upload-image", post(upload_image))
        .route("/images/{container}/{name}", get(serve_image))
        .nest("/admin", admin)
        .layer(DefaultBodyLimit::max(state.config.max_upload_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Registration payload.  `passwordHash` carries the plaintext password at
/// this layer (the field name is the wire contract inherited from the web
/// frontend); the one-way hash is computed server-side.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterInput {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password_hash: String,
    #[serde(default)]
    gender: String,
    #[serde(default)]
    is_admin: bool,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginInput {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    is_admin: bool,
    full_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitFeedbackInput {
    #[serde(default)]
    heading: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    subcategory: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    image_url: String,
}

/// Reject when any named field is empty, reporting the missing names.
fn require_fields(fields: &[(&str, &str)]) -> Result<(), ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_fields(&[
        ("fullName", &input.full_name),
        ("email", &input.email),
        ("passwordHash", &input.password_hash),
    ])?;

    let password_hash = auth::hash_password(&input.password_hash)?;

    let user = NewUser {
        full_name: input.full_name,
        email: input.email,
        password_hash,
        gender: input.gender,
        is_admin: input.is_admin,
        image: input.image,
    };

    let db = state.db.lock().await;
    match db.insert_user(&user) {
        Ok(id) => {
            info!(user_id = id, "user registered");
            Ok(Json(MessageResponse::new("User registered")))
        }
        Err(StoreError::DuplicateEmail) => Err(ApiError::DuplicateEmail),
        Err(other) => Err(other.into()),
    }
}

async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = {
        let db = state.db.lock().await;
        db.get_user_by_email(&input.email)
    };

    // Unknown email and wrong password produce the same response.
    let user = match user {
        Ok(user) => user,
        Err(StoreError::NotFound) => return Err(ApiError::InvalidCredentials),
        Err(other) => return Err(other.into()),
    };

    if !auth::verify_password(&input.password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let claims = AuthClaims::new(user.id, &user.email, &user.full_name, user.is_admin);
    let token = issue_token(&claims, &state.signing_key);

    info!(user_id = user.id, "login succeeded");

    Ok(Json(LoginResponse {
        token,
        is_admin: user.is_admin,
        full_name: user.full_name,
    }))
}

async fn submit_feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<SubmitFeedbackInput>,
) -> Result<Json<MessageResponse>, ApiError> {
    // Identity first: nothing is validated or persisted for anonymous calls.
    let claims = auth::resolve_claims(&headers, &state.verifying_key)?;

    require_fields(&[
        ("heading", &input.heading),
        ("category", &input.category),
        ("subcategory", &input.subcategory),
        ("message", &input.message),
    ])?;

    let feedback = NewFeedback {
        heading: input.heading,
        category: input.category,
        subcategory: input.subcategory,
        message: input.message,
        user_id: claims.user_id,
        image: input.image,
    };

    let stored = {
        let db = state.db.lock().await;
        db.insert_feedback(&feedback)
    }?;

    info!(
        feedback_id = stored.id,
        user_id = claims.user_id,
        category = %stored.category,
        "feedback submitted"
    );

    Ok(Json(MessageResponse::new("Feedback submitted successfully.")))
}

async fn my_feedbacks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<OwnFeedback>>, ApiError> {
    let claims = auth::resolve_claims(&headers, &state.verifying_key)?;

    let rows = {
        let db = state.db.lock().await;
        db.feedbacks_for_user(claims.user_id)
    }?;

    let feed = rows
        .into_iter()
        .map(|f| OwnFeedback {
            heading: f.heading,
            category: f.category,
            subcategory: f.subcategory,
            message: f.message,
            submitted_at: f.submitted_at,
            image_url: f.image,
        })
        .collect();

    Ok(Json(feed))
}

async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name().unwrap_or("") != "file" {
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read field: {}", e)))?;

        let image_url = state.blob_store.store_image(&file_name, &data).await?;

        info!(url = %image_url, size = data.len(), "image uploaded");

        return Ok(Json(UploadResponse { image_url }));
    }

    Err(ApiError::Validation("No file uploaded".to_string()))
}

async fn serve_image(
    State(state): State<AppState>,
    Path((container, name)): Path<(String, String)>,
) -> Result<Vec<u8>, ApiError> {
    if container != state.blob_store.container() {
        return Err(ApiError::NotFound("Image not found".to_string()));
    }
    let data = state.blob_store.open_image(&name).await?;
    Ok(data)
}

// ─── Admin endpoints (role-gated by middleware) ───

async fn all_feedbacks(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminFeedbackRecord>>, ApiError> {
    let rows = {
        let db = state.db.lock().await;
        db.all_feedbacks_with_owner()
    }?;

    // Annotation is best-effort, one call per record; a failing call
    // degrades that record to Unknown inside the client.
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let sentiment = state.sentiment.analyze(&row.feedback.message).await;
        records.push(AdminFeedbackRecord {
            id: row.feedback.id,
            heading: row.feedback.heading,
            category: row.feedback.category,
            subcategory: row.feedback.subcategory,
            message: row.feedback.message,
            submitted_at: row.feedback.submitted_at,
            image_url: row.feedback.image,
            full_name: row.full_name,
            email: row.email,
            sentiment,
        });
    }

    Ok(Json(records))
}

async fn delete_feedback(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = {
        let db = state.db.lock().await;
        db.delete_feedback(id)
    }?;

    if !deleted {
        return Err(ApiError::NotFound("Feedback not found".to_string()));
    }

    info!(feedback_id = id, "feedback deleted");
    Ok(Json(MessageResponse::new("Feedback deleted successfully")))
}

async fn users_with_feedbacks(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserWithFeedbacks>>, ApiError> {
    let rows = {
        let db = state.db.lock().await;
        db.users_with_feedbacks()
    }?;

    let view = rows
        .into_iter()
        .map(|(user, feedbacks)| UserWithFeedbacks {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            feedbacks: feedbacks
                .into_iter()
                .map(|f| FeedbackEntry {
                    id: f.id,
                    heading: f.heading,
                    category: f.category,
                    subcategory: f.subcategory,
                    message: f.message,
                    submitted_at: f.submitted_at,
                })
                .collect(),
        })
        .collect();

    Ok(Json(view))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
