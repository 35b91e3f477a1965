// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for an OpenAI-compatible chat completions API (Groq by default).
//!
//! Responses are relayed as raw JSON so the front end sees exactly what the
//! provider sent. Non-success statuses are surfaced with the provider's
//! status code and body intact.

use crate::error::AppError;
use crate::models::CompletionMessage;
use serde::Serialize;

/// Admissions-assistant persona sent ahead of every conversation.
pub const SYSTEM_PROMPT: &str = "You are an admission assistant specialized in Gujarat colleges in India. Your knowledge includes:
- Detailed information about colleges across different districts in Gujarat
- Prefer \"https://gujacpc.admissions.nic.in/\" for official admission information
- Admission requirements and procedures for various programs
- Important entrance exams like GUJCET, JEE, NEET for Gujarat colleges
- College-specific cutoffs and merit criteria
- Scholarship opportunities specific to Gujarat institutions
- Fee structures and financial aid options
- Campus facilities and infrastructure
- Course offerings and specializations
- Placement statistics and career opportunities
- Important dates and deadlines for admissions

Always provide accurate, up-to-date information about Gujarat colleges. If unsure about any specific detail, acknowledge the uncertainty and guide users to official sources. Be helpful, concise, and focus on Gujarat-specific educational information.";

/// Prepend the system prompt unless the conversation already starts with a
/// system message.
pub fn with_system_prompt(messages: Vec<CompletionMessage>) -> Vec<CompletionMessage> {
    if messages.first().is_some_and(|m| m.role == "system") {
        return messages;
    }

    let mut out = Vec::with_capacity(messages.len() + 1);
    out.push(CompletionMessage::new("system", SYSTEM_PROMPT));
    out.extend(messages);
    out
}

/// Request body for `POST {base_url}/chat/completions`.
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    messages: &'a [CompletionMessage],
    model: &'a str,
}

/// LLM API client.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl LlmClient {
    /// Create a new client. `base_url` must not end with a slash.
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    /// Run a chat completion and return the provider's JSON response.
    ///
    /// `messages` are sent as given; callers apply [`with_system_prompt`].
    pub async fn chat_completion(
        &self,
        messages: &[CompletionMessage],
    ) -> Result<serde_json::Value, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::NotConfigured("LLM API key not configured".to_string()))?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            messages,
            model: &self.model,
        };

        tracing::info!(
            model = %self.model,
            message_count = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LlmApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json(
        &self,
        response: reqwest::Response,
    ) -> Result<serde_json::Value, AppError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::LlmUpstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::LlmApi(format!("JSON parse error: {}", e)))
    }
}

/// Pull the assistant text out of a chat completion response.
pub fn first_choice_content(response: &serde_json::Value) -> Option<&str> {
    response
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}
