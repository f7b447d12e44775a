//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::types::{ChatResponse, ErrorResponse, INVALID_FORMAT_MESSAGE, SERVER_ERROR_MESSAGE};
use super::AppState;
use crate::message::Message;
use crate::responder::SelectError;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Create the API router
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the chat page
        .route("/", get(serve_index))
        // Static assets (embedded or filesystem fallback)
        .route("/assets/*path", get(serve_static))
        .route("/api/chat", post(chat))
        .route("/version", get(get_version))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================
// Chat Page
// ============================================================

async fn serve_index() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

// ============================================================
// Chat
// ============================================================

async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Json<ChatResponse>, AppError> {
    let messages = parse_history(&body)?;

    let delay = state.latency.sample();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let selection = state.selector.select(&messages).map_err(|e| match e {
        SelectError::EmptyHistory => AppError::BadRequest(e.to_string()),
        SelectError::RandomSourceUnavailable => AppError::Internal(e.to_string()),
    })?;

    tracing::info!(
        history_len = messages.len(),
        rule = ?selection.kind,
        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        "Chat reply selected"
    );

    Ok(Json(ChatResponse {
        message: selection.text,
    }))
}

/// Extract a non-empty message history from a raw request body
fn parse_history(body: &[u8]) -> Result<Vec<Message>, AppError> {
    let mut value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Body is not JSON: {e}")))?;

    let messages = value
        .as_object_mut()
        .and_then(|obj| obj.remove("messages"))
        .ok_or_else(|| AppError::BadRequest("Missing messages field".to_string()))?;

    if !messages.is_array() {
        return Err(AppError::BadRequest("messages is not an array".to_string()));
    }

    let messages: Vec<Message> = serde_json::from_value(messages)
        .map_err(|e| AppError::BadRequest(format!("Invalid message: {e}")))?;

    if messages.is_empty() {
        return Err(AppError::BadRequest("messages is empty".to_string()));
    }

    Ok(messages)
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("chat-demo ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
pub(super) enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(detail) => {
                tracing::warn!(%detail, "Rejected chat request");
                (StatusCode::BAD_REQUEST, INVALID_FORMAT_MESSAGE)
            }
            AppError::Internal(detail) => {
                tracing::error!(%detail, "Chat API error");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE)
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Turn a handler panic into the generic 500 body
#[allow(clippy::needless_pass_by_value)] // signature required by CatchPanicLayer
pub(super) fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    AppError::Internal(format!("Handler panicked: {detail}")).into_response()
}
