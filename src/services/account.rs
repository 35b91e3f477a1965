// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account management: OTP-gated signup, password login, password reset and
//! profile updates.

use crate::db::Database;
use crate::error::AppError;
use crate::models::user::normalize_email;
use crate::models::{OtpPurpose, User, UserRole};
use crate::services::OtpService;
use crate::time_utils::now_rfc3339;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Input for [`AccountService::register`].
#[derive(Debug, Clone)]
pub struct NewAccount<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub otp: &'a str,
}

/// Profile fields a user may change. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Account service.
#[derive(Clone)]
pub struct AccountService {
    db: Database,
    otp: OtpService,
}

impl AccountService {
    pub fn new(db: Database, otp: OtpService) -> Self {
        Self { db, otp }
    }

    /// Register a new user after verifying their signup OTP.
    ///
    /// The OTP is checked before anything else, so a bad code never creates
    /// an account.
    pub async fn register(&self, account: NewAccount<'_>) -> Result<User, AppError> {
        let email = normalize_email(account.email);
        validate_password(account.password)?;

        self.otp
            .verify(&email, account.otp, OtpPurpose::Signup)
            .await?;

        if self.db.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(account.password)?;
        let now = now_rfc3339();
        let username = account.username.trim().to_string();

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            display_name: Some(username.clone()),
            username,
            password_hash,
            role: UserRole::Student,
            photo_url: None,
            created_at: now.clone(),
            last_login: Some(now),
            updated_at: None,
        };

        self.db.upsert_user(&user).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and record the login.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);

        let mut user = self
            .db
            .find_user_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        user.last_login = Some(now_rfc3339());
        self.db.upsert_user(&user).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Send a password reset code if an account exists for `email`.
    ///
    /// Unknown addresses are ignored silently so callers cannot probe for
    /// registered emails.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_email(email);

        if self.db.find_user_by_email(&email).await?.is_none() {
            tracing::info!("Password reset requested for unknown email");
            return Ok(());
        }

        self.otp.send(&email, OtpPurpose::PasswordReset).await
    }

    /// Set a new password using a password reset code.
    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let email = normalize_email(email);
        validate_password(new_password)?;

        self.otp
            .verify(&email, otp, OtpPurpose::PasswordReset)
            .await?;

        let mut user = self
            .db
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        user.password_hash = hash_password(new_password)?;
        user.updated_at = Some(now_rfc3339());
        self.db.upsert_user(&user).await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    /// Get a user by ID.
    pub async fn get(&self, user_id: &str) -> Result<User, AppError> {
        self.db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    /// Merge profile changes into the stored user.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<User, AppError> {
        // Fetch-modify-write to preserve other fields
        let mut user = self.get(user_id).await?;

        if let Some(display_name) = update.display_name {
            user.display_name = Some(display_name);
        }
        if let Some(photo_url) = update.photo_url {
            user.photo_url = Some(photo_url);
        }
        user.updated_at = Some(now_rfc3339());

        self.db.upsert_user(&user).await?;
        Ok(user)
    }
}

/// Check password requirements.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AppError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AppError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredentials)
}
