// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chat history and LLM completion routes.
//!
//! All routes here require authentication; the middleware is applied in
//! routes/mod.rs.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ChatMessage, ChatRole, CompletionMessage};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Longest accepted chat message, in characters.
const MAX_MESSAGE_CHARS: usize = 10_000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chat/history", get(get_history))
        .route("/api/chat/send", post(send_message))
        .route("/api/chat/ask", post(ask))
        .route("/api/chat/completion", post(completion))
        .route("/api/chat/{chat_id}", delete(delete_message))
}

// ─── History ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct HistoryQuery {
    /// Optional smaller page size (never above the server cap)
    limit: Option<u32>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HistoryResponse {
    pub messages: Vec<ChatMessage>,
}

/// Get the user's chat history, newest first.
async fn get_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>> {
    tracing::debug!(user_id = %user.user_id, limit = ?params.limit, "Fetching chat history");

    let messages = state
        .chat_service
        .history(&user.user_id, params.limit)
        .await?;

    Ok(Json(HistoryResponse { messages }))
}

// ─── Send / Delete ───────────────────────────────────────────

#[derive(Deserialize)]
struct SendMessageRequest {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    role: ChatRole,
}

fn require_message(message: Option<&str>) -> Result<&str> {
    let message = message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Message is required".to_string()))?;

    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::BadRequest(format!(
            "Message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }

    Ok(message)
}

/// Store a message in the user's history.
async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>)> {
    let message = require_message(body.message.as_deref())?;

    let stored = state
        .chat_service
        .send(&user.user_id, message, body.role)
        .await?;

    Ok((StatusCode::CREATED, Json(stored)))
}

#[derive(Serialize)]
pub struct DeleteMessageResponse {
    pub message: String,
}

/// Delete one of the user's messages.
async fn delete_message(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(chat_id): Path<String>,
) -> Result<Json<DeleteMessageResponse>> {
    state.chat_service.delete(&user.user_id, &chat_id).await?;

    Ok(Json(DeleteMessageResponse {
        message: "Message deleted successfully".to_string(),
    }))
}

// ─── LLM ─────────────────────────────────────────────────────

/// Parse `{"messages": [{role, content}, ...]}`.
///
/// Any body that is not that shape, including one that is not JSON at all,
/// is an invalid request.
fn parse_completion_messages(body: &[u8]) -> Result<Vec<CompletionMessage>> {
    let invalid = || AppError::BadRequest("Invalid request format".to_string());

    match serde_json::from_slice::<serde_json::Value>(body).map_err(|_| invalid())? {
        serde_json::Value::Object(mut map) => match map.remove("messages") {
            Some(messages @ serde_json::Value::Array(_)) => {
                serde_json::from_value(messages).map_err(|_| invalid())
            }
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}

/// Relay a conversation to the LLM and return its response verbatim.
async fn completion(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<Json<serde_json::Value>> {
    let messages = parse_completion_messages(&body)?;

    tracing::info!(
        user_id = %user.user_id,
        message_count = messages.len(),
        "Chat completion requested"
    );

    let response = state.chat_service.complete(messages).await?;
    Ok(Json(response))
}

#[derive(Deserialize)]
struct AskRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AskResponse {
    pub user_message: ChatMessage,
    pub assistant_message: ChatMessage,
}

/// Ask the assistant, using and extending the stored history.
async fn ask(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let message = require_message(body.message.as_deref())?;

    let exchange = state.chat_service.ask(&user.user_id, message).await?;

    Ok(Json(AskResponse {
        user_message: exchange.user_message,
        assistant_message: exchange.assistant_message,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_completion_messages() {
        let body = json!({
            "messages": [{"role": "user", "content": "hi"}]
        });
        let messages = parse_completion_messages(body.to_string().as_bytes()).unwrap();
        assert_eq!(messages, vec![CompletionMessage::new("user", "hi")]);
    }

    #[test]
    fn test_parse_completion_messages_rejects_bad_shapes() {
        for body in [
            json!({}).to_string(),
            json!({"messages": "hello"}).to_string(),
            json!({"messages": {"role": "user"}}).to_string(),
            json!({"messages": [{"role": "user"}]}).to_string(),
            json!([{"role": "user", "content": "hi"}]).to_string(),
            "not json".to_string(),
            String::new(),
        ] {
            assert!(
                matches!(
                    parse_completion_messages(body.as_bytes()),
                    Err(AppError::BadRequest(_))
                ),
                "should reject {body:?}"
            );
        }
    }

    #[test]
    fn test_require_message() {
        assert!(require_message(None).is_err());
        assert!(require_message(Some("   ")).is_err());
        let too_long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(require_message(Some(too_long.as_str())).is_err());
        assert_eq!(require_message(Some("hello")).unwrap(), "hello");
    }
}
