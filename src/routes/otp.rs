// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email verification code routes.

use crate::error::Result;
use crate::models::OtpPurpose;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/otp/send", post(send_otp))
        .route("/api/otp/verify", post(verify_otp))
}

#[derive(Deserialize, Validate)]
pub struct SendOtpRequest {
    #[validate(email)]
    email: String,
}

#[derive(Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email)]
    email: String,
    #[validate(length(min = 1, max = 16))]
    otp: String,
}

/// Outcome of an OTP operation.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct OtpResponse {
    pub success: bool,
    pub message: String,
}

/// Email a signup verification code.
async fn send_otp(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendOtpRequest>,
) -> Result<Json<OtpResponse>> {
    body.validate()?;

    state
        .otp_service
        .send(&body.email, OtpPurpose::Signup)
        .await?;

    Ok(Json(OtpResponse {
        success: true,
        message: "OTP sent successfully".to_string(),
    }))
}

/// Check a signup verification code. A successful check consumes it.
async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<OtpResponse>> {
    body.validate()?;

    state
        .otp_service
        .verify(&body.email, &body.otp, OtpPurpose::Signup)
        .await?;

    Ok(Json(OtpResponse {
        success: true,
        message: "OTP verified successfully".to_string(),
    }))
}
