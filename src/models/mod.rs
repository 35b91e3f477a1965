// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod chat;
pub mod otp;
pub mod user;

pub use chat::{ChatMessage, ChatRole, CompletionMessage};
pub use otp::{OtpPurpose, OtpRecord};
pub use user::{User, UserProfile, UserRole};
