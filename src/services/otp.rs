// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-time password issuance and verification.
//!
//! A code is a 6-digit number stored with its issue time. It verifies once,
//! for the same email and purpose, while younger than the configured TTL.

use crate::db::Database;
use crate::error::AppError;
use crate::models::user::normalize_email;
use crate::models::{OtpPurpose, OtpRecord};
use crate::services::EmailService;
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Generate a 6-digit verification code.
pub fn generate_code() -> String {
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}

/// OTP lifecycle service.
#[derive(Clone)]
pub struct OtpService {
    db: Database,
    email: EmailService,
    ttl: Duration,
}

impl OtpService {
    pub fn new(db: Database, email: EmailService, ttl_secs: i64) -> Self {
        Self {
            db,
            email,
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Issue a new code for `email` and mail it.
    ///
    /// Expired codes for the same address are purged first. Unexpired codes
    /// stay valid until used or expired.
    pub async fn send(&self, email: &str, purpose: OtpPurpose) -> Result<(), AppError> {
        self.send_at(email, purpose, Utc::now()).await
    }

    async fn send_at(
        &self,
        email: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let email = normalize_email(email);
        let cutoff = format_utc_rfc3339(now - self.ttl);

        let purged = self.db.delete_expired_otps(&email, &cutoff).await?;
        if purged > 0 {
            tracing::debug!(email = %email, purged, "Purged expired OTPs");
        }

        let record = OtpRecord {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.clone(),
            otp: generate_code(),
            purpose,
            created_at: format_utc_rfc3339(now),
            verified: false,
        };

        self.db.insert_otp(&record).await?;

        self.email
            .send_otp(&email, &record.otp, purpose, self.ttl.num_minutes())
            .await?;

        tracing::info!(email = %email, purpose = purpose.as_str(), "OTP issued");
        Ok(())
    }

    /// Verify and consume a code.
    ///
    /// Returns `AppError::InvalidOtp` when no matching, unexpired code exists.
    pub async fn verify(
        &self,
        email: &str,
        otp: &str,
        purpose: OtpPurpose,
    ) -> Result<(), AppError> {
        self.verify_at(email, otp, purpose, Utc::now()).await
    }

    /// Verify against an explicit clock.
    pub async fn verify_at(
        &self,
        email: &str,
        otp: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let email = normalize_email(email);
        let otp = otp.trim();
        let issued_after = format_utc_rfc3339(now - self.ttl);

        let record = self
            .db
            .find_valid_otp(&email, otp, purpose, &issued_after)
            .await?
            .ok_or_else(|| {
                tracing::info!(email = %email, purpose = purpose.as_str(), "OTP rejected");
                AppError::InvalidOtp
            })?;

        self.db.delete_otp(&record.id).await?;

        tracing::info!(email = %email, purpose = purpose.as_str(), "OTP verified");
        Ok(())
    }
}
