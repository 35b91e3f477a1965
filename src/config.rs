// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development. Secrets (JWT key, LLM API
//! key, SMTP password) are injected as environment variables in production.

use std::env;

/// Default OpenAI-compatible endpoint for chat completions.
pub const DEFAULT_LLM_API_URL: &str = "https://api.groq.com/openai/v1";

/// Default model requested from the LLM provider.
pub const DEFAULT_LLM_MODEL: &str = "mixtral-8x7b-32768";

/// Default lifetime of a one-time password (5 minutes).
pub const DEFAULT_OTP_TTL_SECS: i64 = 5 * 60;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL for CORS and cookie attributes
    pub frontend_url: String,
    /// GCP project ID hosting the Firestore database
    pub gcp_project_id: String,
    /// Keep all data in process memory instead of Firestore
    pub use_in_memory_db: bool,
    /// Server port
    pub port: u16,
    /// Base URL of the OpenAI-compatible LLM API (no trailing slash)
    pub llm_api_url: String,
    /// Model name sent with every completion request
    pub llm_model: String,
    /// How long an issued OTP stays valid, in seconds
    pub otp_ttl_secs: i64,
    /// Outgoing mail settings
    pub smtp: SmtpConfig,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// LLM provider API key. Completion requests fail with 500 when unset.
    pub llm_api_key: Option<String>,
}

/// SMTP settings. Mail is only delivered when `host` is set.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 587,
            username: String::new(),
            password: String::new(),
            from_address: "StudentGuideAI <noreply@studentguide.local>".to_string(),
        }
    }
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            use_in_memory_db: true,
            port: 8080,
            llm_api_url: DEFAULT_LLM_API_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            otp_ttl_secs: DEFAULT_OTP_TTL_SECS,
            smtp: SmtpConfig::default(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            llm_api_key: Some("test_llm_key".to_string()),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let smtp_defaults = SmtpConfig::default();

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: first_var(&["GCP_PROJECT_ID", "FIREBASE_PROJECT_ID"])
                .unwrap_or_else(|| "local-dev".to_string()),
            use_in_memory_db: env::var("USE_IN_MEMORY_DB")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
            port: parse_var("PORT", 8080)?,
            llm_api_url: env::var("LLM_API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_LLM_API_URL.to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            otp_ttl_secs: parse_var("OTP_TTL_SECS", DEFAULT_OTP_TTL_SECS)?,
            smtp: SmtpConfig {
                host: env::var("MAIL_HOST")
                    .ok()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty()),
                port: parse_var("MAIL_PORT", smtp_defaults.port)?,
                username: env::var("MAIL_USER").unwrap_or_default(),
                password: env::var("MAIL_PASS")
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default(),
                from_address: env::var("MAIL_FROM").unwrap_or(smtp_defaults.from_address),
            },

            // Secrets
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            llm_api_key: first_var(&["LLM_API_KEY", "GROQ_API_KEY"])
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

/// Return the value of the first variable in `names` that is set.
fn first_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| env::var(name).ok())
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
