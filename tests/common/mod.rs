// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use admission_assistant::config::Config;
use admission_assistant::db::{Database, FirestoreDb};
use admission_assistant::routes::create_router;
use admission_assistant::services::EmailService;
use admission_assistant::AppState;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app over an in-memory database with outbox email.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(Config::default())
}

/// Same as [`create_test_app`] with a custom config.
#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (Router, Arc<AppState>) {
    let email = EmailService::new_outbox(&config.smtp.from_address);
    let state = Arc::new(AppState::new(config, Database::in_memory(), email));

    (create_router(state.clone()), state)
}

/// Response pieces the tests look at.
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send a request through the router. `body` is sent as JSON.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Most recent OTP code emailed to `email`.
#[allow(dead_code)]
pub async fn last_otp(state: &AppState, email: &str) -> String {
    let sent = state.email.sent().await;
    let message = sent
        .iter()
        .rev()
        .find(|m| m.to == email)
        .expect("no email sent to address");

    message
        .text_body
        .split_whitespace()
        .find(|word| word.len() == 6 && word.chars().all(|c| c.is_ascii_digit()))
        .expect("no code in email")
        .to_string()
}

/// Run the full OTP + signup flow. Returns the session token and user ID.
#[allow(dead_code)]
pub async fn register_user(
    app: &Router,
    state: &AppState,
    email: &str,
    password: &str,
) -> (String, String) {
    let res = send(
        app,
        "POST",
        "/api/otp/send",
        None,
        Some(serde_json::json!({ "email": email })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);

    let otp = last_otp(state, email).await;

    let res = send(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({
            "username": "student",
            "email": email,
            "password": password,
            "otp": otp,
        })),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED, "signup failed: {}", res.body);

    (
        res.body["token"].as_str().unwrap().to_string(),
        res.body["user"]["id"].as_str().unwrap().to_string(),
    )
}

/// Stand-in LLM provider.
#[allow(dead_code)]
pub struct MockLlm {
    /// Base URL to put in `Config::llm_api_url`
    pub base_url: String,
    /// Request bodies received, in order
    pub requests: Arc<Mutex<Vec<Value>>>,
}

/// Serve `POST /chat/completions` on a local port, answering every request
/// with `status` and `response`.
#[allow(dead_code)]
pub async fn spawn_mock_llm(status: StatusCode, response: Value) -> MockLlm {
    let requests: Arc<Mutex<Vec<Value>>> = Arc::default();
    let recorded = requests.clone();

    let app = Router::new().route(
        "/chat/completions",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let recorded = recorded.clone();
            let response = response.clone();
            async move {
                assert_eq!(
                    headers
                        .get(header::AUTHORIZATION)
                        .and_then(|h| h.to_str().ok()),
                    Some("Bearer test_llm_key")
                );
                recorded.lock().await.push(body);
                (status, Json(response))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockLlm {
        base_url: format!("http://{}", addr),
        requests,
    }
}

/// A successful completion response carrying `content`.
#[allow(dead_code)]
pub fn completion_response(content: &str) -> Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "mixtral-8x7b-32768",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

/// Test app whose LLM client points at `mock`.
#[allow(dead_code)]
pub fn create_test_app_with_llm(mock: &MockLlm) -> (Router, Arc<AppState>) {
    let config = Config {
        llm_api_url: mock.base_url.clone(),
        ..Config::default()
    };
    create_test_app_with(config)
}
