//! HTTP channel: JSON chat API over axum.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::guidance::{Language, SessionRegistry};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub complete: bool,
    pub session_id: String,
    pub error: bool,
}

#[derive(Debug, Deserialize)]
pub struct RestartRequest {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub session_id: String,
    pub language: String,
}

/// Build the chat API router.
pub fn api_routes(registry: Arc<SessionRegistry>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/restart", post(restart))
        .route("/api/language", post(set_language))
        .with_state(AppState { registry })
}

/// CORS restricted to the configured front-end origins. Origins that are not
/// valid header values are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Career Guidance AI API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "career-guidance-agent"
    }))
}

async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> impl IntoResponse {
    let session_id = req
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(SessionRegistry::new_session_id);

    if req.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "detail": "Please provide a valid message.",
                "session_id": session_id
            })),
        );
    }

    let agent = state.registry.get_or_create(&session_id).await;
    let reply = agent.lock().await.process_input(&req.message).await;
    info!(session_id = %session_id, complete = reply.complete, "Chat turn handled");

    let body = ChatResponse {
        response: reply.response,
        complete: reply.complete,
        session_id,
        error: false,
    };
    (StatusCode::OK, Json(serde_json::json!(body)))
}

async fn restart(State(state): State<AppState>, Json(req): Json<RestartRequest>) -> impl IntoResponse {
    if !state.registry.reset(&req.session_id).await {
        info!(session_id = %req.session_id, "Restart for unknown session, nothing to do");
    }
    Json(serde_json::json!({
        "success": true,
        "message": "Conversation reset successfully."
    }))
}

async fn set_language(
    State(state): State<AppState>,
    Json(req): Json<LanguageRequest>,
) -> impl IntoResponse {
    let Some(language) = Language::from_code(&req.language) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "message": format!("Unsupported language: {}", req.language)
            })),
        );
    };

    let agent = state.registry.get_or_create(&req.session_id).await;
    agent.lock().await.set_language(language.code());
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "language": language.code()
        })),
    )
}
