// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired OTP")]
    InvalidOtp,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// The LLM provider answered with a non-success status.
    #[error("LLM API returned HTTP {status}: {body}")]
    LlmUpstream { status: u16, body: String },

    /// The LLM provider could not be reached or returned garbage.
    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("Email delivery error: {0}")]
    Email(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_keys()
            .map(|k| k.to_string())
            .collect();
        fields.sort_unstable();
        AppError::BadRequest(format!("Invalid field(s): {}", fields.join(", ")))
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        fn text(msg: &str) -> Option<serde_json::Value> {
            Some(serde_json::Value::String(msg.to_string()))
        }

        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                text("Invalid email or password"),
            ),
            AppError::InvalidOtp => (
                StatusCode::BAD_REQUEST,
                "invalid_otp",
                text("Invalid or expired OTP"),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", text(msg)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", text(msg)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", text(msg)),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", text(msg)),
            AppError::NotConfigured(msg) => {
                tracing::error!(reason = %msg, "Required service not configured");
                (StatusCode::INTERNAL_SERVER_ERROR, "not_configured", text(msg))
            }
            AppError::LlmUpstream { status, body } => {
                tracing::warn!(status, body = %body, "LLM API returned an error");
                // Relay the provider status; keep its body as JSON when it is JSON.
                let status =
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let details = serde_json::from_str(body)
                    .unwrap_or_else(|_| serde_json::Value::String(body.clone()));
                (status, "llm_error", Some(details))
            }
            AppError::LlmApi(msg) => {
                tracing::error!(error = %msg, "LLM API request failed");
                (StatusCode::BAD_GATEWAY, "llm_error", text(msg))
            }
            AppError::Email(msg) => {
                tracing::error!(error = %msg, "Email delivery failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "email_error", None)
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
