// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod account;
pub mod chat;
pub mod email;
pub mod llm;
pub mod otp;

pub use account::AccountService;
pub use chat::ChatService;
pub use email::EmailService;
pub use llm::LlmClient;
pub use otp::OtpService;
