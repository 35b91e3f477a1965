// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use admission_assistant::error::AppError;
use axum::{http::StatusCode, response::IntoResponse};
use serde_json::{json, Value};

async fn render(err: AppError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_client_errors_carry_details() {
    let (status, body) = render(AppError::NotFound("Message not found".to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "not_found", "details": "Message not found" }));

    let (status, body) = render(AppError::Forbidden("nope".to_string())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, body) = render(AppError::Conflict("User already exists".to_string())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"], "User already exists");

    let (status, body) = render(AppError::InvalidOtp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_otp");
}

#[tokio::test]
async fn test_auth_errors_have_no_details() {
    let (status, body) = render(AppError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "unauthorized" }));

    let (status, body) = render(AppError::InvalidToken).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "invalid_token" }));
}

#[tokio::test]
async fn test_internal_errors_are_not_leaked() {
    let (status, body) = render(AppError::Database("connection reset by peer".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "database_error" }));

    let (status, body) = render(AppError::Internal(anyhow::anyhow!("secret detail"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "internal_error" }));

    let (_, body) = render(AppError::Email("smtp auth failed".to_string())).await;
    assert_eq!(body, json!({ "error": "email_error" }));
}

#[tokio::test]
async fn test_llm_upstream_relays_status_and_json_body() {
    let (status, body) = render(AppError::LlmUpstream {
        status: 401,
        body: r#"{"error":{"message":"Invalid API Key"}}"#.to_string(),
    })
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "llm_error");
    assert_eq!(body["details"]["error"]["message"], "Invalid API Key");
}

#[tokio::test]
async fn test_llm_upstream_plain_text_body() {
    let (status, body) = render(AppError::LlmUpstream {
        status: 503,
        body: "upstream unavailable".to_string(),
    })
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["details"], "upstream unavailable");
}

#[tokio::test]
async fn test_not_configured_is_server_error() {
    let (status, body) =
        render(AppError::NotConfigured("LLM API key not configured".to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "not_configured");
}
