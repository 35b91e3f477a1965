// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API input validation security tests.

use admission_assistant::middleware::auth::create_jwt;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::send;

#[tokio::test]
async fn test_message_too_long() {
    let (app, state) = common::create_test_app();
    let token = create_jwt("user-1", &state.config.jwt_signing_key).unwrap();

    let res = send(
        &app,
        "POST",
        "/api/chat/send",
        Some(&token),
        Some(json!({ "message": "a".repeat(10_001) })),
    )
    .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_history_limit() {
    let (app, state) = common::create_test_app();
    let token = create_jwt("user-1", &state.config.jwt_signing_key).unwrap();

    let res = send(
        &app,
        "GET",
        "/api/chat/history?limit=-5",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_body() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/otp/send")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"email\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_otp_send_missing_email() {
    let (app, _) = common::create_test_app();

    let res = send(&app, "POST", "/api/otp/send", None, Some(json!({}))).await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_with_malformed_email_is_invalid_credentials() {
    let (app, _) = common::create_test_app();

    let res = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "nope", "password": "password123" })),
    )
    .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "invalid_credentials");
}

#[tokio::test]
async fn test_password_reset_confirm_short_password() {
    let (app, _) = common::create_test_app();

    let res = send(
        &app,
        "POST",
        "/api/auth/password-reset/confirm",
        None,
        Some(json!({ "email": "a@example.com", "otp": "123456", "new_password": "short" })),
    )
    .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["details"], "Invalid field(s): new_password");
}
