// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (account records)
//! - OTP verifications (pending one-time passwords)
//! - Chats (per-user message history)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{ChatMessage, OtpPurpose, OtpRecord, User};
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 20;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a disconnected client (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_offline() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by normalized email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.for_all([q.field("email").eq(email)]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    /// Create or replace a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── OTP Operations ──────────────────────────────────────────

    /// Store a freshly issued OTP.
    pub async fn insert_otp(&self, record: &OtpRecord) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::OTP_VERIFICATIONS)
            .document_id(&record.id)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Find an unverified OTP matching email, code and purpose that was
    /// issued strictly after `issued_after`.
    pub async fn find_valid_otp(
        &self,
        email: &str,
        otp: &str,
        purpose: OtpPurpose,
        issued_after: &str,
    ) -> Result<Option<OtpRecord>, AppError> {
        let records: Vec<OtpRecord> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::OTP_VERIFICATIONS)
            .filter(|q| {
                q.for_all([
                    q.field("email").eq(email),
                    q.field("otp").eq(otp),
                    q.field("purpose").eq(purpose.as_str()),
                    q.field("verified").eq(false),
                    q.field("created_at").greater_than(issued_after),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(records.into_iter().next())
    }

    /// Delete an OTP record.
    pub async fn delete_otp(&self, otp_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::OTP_VERIFICATIONS)
            .document_id(otp_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete this email's OTP records issued at or before `cutoff`.
    ///
    /// Returns the number of records removed.
    pub async fn delete_expired_otps(&self, email: &str, cutoff: &str) -> Result<usize, AppError> {
        let client = self.get_client()?;

        let expired: Vec<OtpRecord> = client
            .fluent()
            .select()
            .from(collections::OTP_VERIFICATIONS)
            .filter(|q| {
                q.for_all([
                    q.field("email").eq(email),
                    q.field("created_at").less_than_or_equal(cutoff),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let count = expired.len();

        stream::iter(expired)
            .map(|record| async move {
                client
                    .fluent()
                    .delete()
                    .from(collections::OTP_VERIFICATIONS)
                    .document_id(&record.id)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        Ok(count)
    }

    // ─── Chat Operations ─────────────────────────────────────────

    /// Store a chat message.
    pub async fn add_chat_message(&self, message: &ChatMessage) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::CHATS)
            .document_id(&message.id)
            .object(message)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a chat message by ID.
    pub async fn get_chat_message(&self, chat_id: &str) -> Result<Option<ChatMessage>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::CHATS)
            .obj()
            .one(chat_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user's most recent messages, newest first.
    pub async fn get_chat_history(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::CHATS)
            .filter(|q| q.for_all([q.field("user_id").eq(user_id)]))
            .order_by([("timestamp", firestore::FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a chat message.
    pub async fn delete_chat_message(&self, chat_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::CHATS)
            .document_id(chat_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
