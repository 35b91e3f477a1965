// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::UserProfile;
use crate::services::account::ProfileUpdate;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me).put(update_me))
}

// ─── User Profile ────────────────────────────────────────────

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let profile = state.account_service.get(&user.user_id).await?;
    Ok(Json(UserProfile::from(&profile)))
}

#[derive(Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    display_name: Option<String>,
    #[validate(url)]
    photo_url: Option<String>,
}

/// Update display name and/or photo.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>> {
    body.validate()?;

    tracing::debug!(user_id = %user.user_id, "Updating profile");

    let updated = state
        .account_service
        .update_profile(
            &user.user_id,
            ProfileUpdate {
                display_name: body.display_name,
                photo_url: body.photo_url,
            },
        )
        .await?;

    Ok(Json(UserProfile::from(&updated)))
}
