// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Admission Assistant: backend API for a college-admissions chatbot
//!
//! This crate provides OTP-verified signup and login, per-user chat
//! history, and a relay to an external chat-completion LLM API.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::{AccountService, ChatService, EmailService, LlmClient, OtpService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub email: EmailService,
    pub otp_service: OtpService,
    pub account_service: AccountService,
    pub chat_service: ChatService,
}

impl AppState {
    /// Wire up all services over a database and mailer.
    pub fn new(config: Config, db: Database, email: EmailService) -> Self {
        let otp_service = OtpService::new(db.clone(), email.clone(), config.otp_ttl_secs);
        let account_service = AccountService::new(db.clone(), otp_service.clone());
        let llm = LlmClient::new(
            config.llm_api_url.clone(),
            config.llm_api_key.clone(),
            config.llm_model.clone(),
        );
        let chat_service = ChatService::new(db.clone(), llm);

        Self {
            config,
            db,
            email,
            otp_service,
            account_service,
            chat_service,
        }
    }
}
