// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signup, login, logout and password reset routes.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, removal_cookie, session_cookie};
use crate::models::{User, UserProfile};
use crate::services::account::NewAccount;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/password-reset", post(request_password_reset))
        .route("/api/auth/password-reset/confirm", post(confirm_password_reset))
}

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 50))]
    username: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 8, max = 128))]
    password: String,
    #[validate(length(equal = 6))]
    otp: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    email: String,
    #[validate(length(min = 1))]
    password: String,
}

#[derive(Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email)]
    email: String,
}

#[derive(Deserialize, Validate)]
pub struct PasswordResetConfirmRequest {
    #[validate(email)]
    email: String,
    #[validate(length(equal = 6))]
    otp: String,
    #[validate(length(min = 8, max = 128))]
    new_password: String,
}

/// Session established by signup or login.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub user: UserProfile,
    pub token: String,
}

/// Generic acknowledgement.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Issue a JWT for `user` and attach it as the session cookie.
fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let token = create_jwt(&user.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let jar = jar.add(session_cookie(token.clone(), state.config.secure_cookies()));

    Ok((
        jar,
        Json(SessionResponse {
            user: UserProfile::from(user),
            token,
        }),
    ))
}

/// Create an account. The signup OTP must be valid.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>)> {
    body.validate()?;

    let user = state
        .account_service
        .register(NewAccount {
            username: &body.username,
            email: &body.email,
            password: &body.password,
            otp: &body.otp,
        })
        .await?;

    let (jar, response) = start_session(&state, jar, &user)?;
    Ok((StatusCode::CREATED, jar, response))
}

/// Log in with email and password.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    body.validate().map_err(|_| AppError::InvalidCredentials)?;

    let user = state
        .account_service
        .login(&body.email, &body.password)
        .await?;

    start_session(&state, jar, &user)
}

/// Log out by clearing the session cookie.
///
/// Tokens are stateless; clients holding a bearer token simply discard it.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(removal_cookie(state.config.secure_cookies()));

    (
        jar,
        Json(MessageResponse {
            success: true,
            message: "Logged out".to_string(),
        }),
    )
}

/// Email a password reset code.
async fn request_password_reset(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>> {
    body.validate()?;

    state
        .account_service
        .request_password_reset(&body.email)
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "If an account exists for this email, a reset code has been sent".to_string(),
    }))
}

/// Set a new password with a reset code.
async fn confirm_password_reset(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PasswordResetConfirmRequest>,
) -> Result<Json<MessageResponse>> {
    body.validate()?;

    state
        .account_service
        .reset_password(&body.email, &body.otp, &body.new_password)
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Password updated".to_string(),
    }))
}
