// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store with the same operations as [`FirestoreDb`].
//!
//! Used for local development without GCP credentials and by the test
//! suite. Data lives only as long as the process.
//!
//! [`FirestoreDb`]: crate::db::FirestoreDb

use crate::error::AppError;
use crate::models::{ChatMessage, OtpPurpose, OtpRecord, User};
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory database keyed by document ID, one map per collection.
#[derive(Clone, Default)]
pub struct MemoryDb {
    users: Arc<DashMap<String, User>>,
    otps: Arc<DashMap<String, OtpRecord>>,
    chats: Arc<DashMap<String, ChatMessage>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(user_id).map(|u| u.value().clone()))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    // ─── OTP Operations ──────────────────────────────────────────

    pub async fn insert_otp(&self, record: &OtpRecord) -> Result<(), AppError> {
        self.otps.insert(record.id.clone(), record.clone());
        Ok(())
    }

    pub async fn find_valid_otp(
        &self,
        email: &str,
        otp: &str,
        purpose: OtpPurpose,
        issued_after: &str,
    ) -> Result<Option<OtpRecord>, AppError> {
        Ok(self
            .otps
            .iter()
            .find(|r| {
                r.email == email
                    && r.otp == otp
                    && r.purpose == purpose
                    && !r.verified
                    && r.created_at.as_str() > issued_after
            })
            .map(|r| r.value().clone()))
    }

    pub async fn delete_otp(&self, otp_id: &str) -> Result<(), AppError> {
        self.otps.remove(otp_id);
        Ok(())
    }

    pub async fn delete_expired_otps(&self, email: &str, cutoff: &str) -> Result<usize, AppError> {
        let mut removed = 0;
        self.otps.retain(|_, r| {
            let expired = r.email == email && r.created_at.as_str() <= cutoff;
            removed += usize::from(expired);
            !expired
        });
        Ok(removed)
    }

    /// Number of stored OTP records (all emails).
    pub fn otp_count(&self) -> usize {
        self.otps.len()
    }

    // ─── Chat Operations ─────────────────────────────────────────

    pub async fn add_chat_message(&self, message: &ChatMessage) -> Result<(), AppError> {
        self.chats.insert(message.id.clone(), message.clone());
        Ok(())
    }

    pub async fn get_chat_message(&self, chat_id: &str) -> Result<Option<ChatMessage>, AppError> {
        Ok(self.chats.get(chat_id).map(|m| m.value().clone()))
    }

    pub async fn get_chat_history(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, AppError> {
        let mut messages: Vec<ChatMessage> = self
            .chats
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.value().clone())
            .collect();

        messages.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });
        messages.truncate(limit as usize);
        Ok(messages)
    }

    pub async fn delete_chat_message(&self, chat_id: &str) -> Result<(), AppError> {
        self.chats.remove(chat_id);
        Ok(())
    }
}
