//! Database layer (Firestore, with an in-memory fallback).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{ChatMessage, OtpPurpose, OtpRecord, User};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Pending one-time passwords
    pub const OTP_VERIFICATIONS: &str = "otp_verifications";
    /// Chat messages (one document per message)
    pub const CHATS: &str = "chats";
}

/// Database handle shared by all services.
#[derive(Clone)]
pub enum Database {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

macro_rules! dispatch {
    ($self:ident, $db:ident => $call:expr) => {
        match $self {
            Database::Firestore($db) => $call.await,
            Database::Memory($db) => $call.await,
        }
    };
}

impl Database {
    /// Fresh, empty in-memory database.
    pub fn in_memory() -> Self {
        Database::Memory(MemoryDb::new())
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        dispatch!(self, db => db.get_user(user_id))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        dispatch!(self, db => db.find_user_by_email(email))
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        dispatch!(self, db => db.upsert_user(user))
    }

    pub async fn insert_otp(&self, record: &OtpRecord) -> Result<(), AppError> {
        dispatch!(self, db => db.insert_otp(record))
    }

    pub async fn find_valid_otp(
        &self,
        email: &str,
        otp: &str,
        purpose: OtpPurpose,
        issued_after: &str,
    ) -> Result<Option<OtpRecord>, AppError> {
        dispatch!(self, db => db.find_valid_otp(email, otp, purpose, issued_after))
    }

    pub async fn delete_otp(&self, otp_id: &str) -> Result<(), AppError> {
        dispatch!(self, db => db.delete_otp(otp_id))
    }

    pub async fn delete_expired_otps(&self, email: &str, cutoff: &str) -> Result<usize, AppError> {
        dispatch!(self, db => db.delete_expired_otps(email, cutoff))
    }

    pub async fn add_chat_message(&self, message: &ChatMessage) -> Result<(), AppError> {
        dispatch!(self, db => db.add_chat_message(message))
    }

    pub async fn get_chat_message(&self, chat_id: &str) -> Result<Option<ChatMessage>, AppError> {
        dispatch!(self, db => db.get_chat_message(chat_id))
    }

    pub async fn get_chat_history(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, AppError> {
        dispatch!(self, db => db.get_chat_history(user_id, limit))
    }

    pub async fn delete_chat_message(&self, chat_id: &str) -> Result<(), AppError> {
        dispatch!(self, db => db.delete_chat_message(chat_id))
    }
}
