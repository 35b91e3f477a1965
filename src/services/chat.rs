// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chat history and the assistant conversation loop.

use crate::db::Database;
use crate::error::AppError;
use crate::models::{ChatMessage, ChatRole, CompletionMessage};
use crate::services::llm::{first_choice_content, with_system_prompt, LlmClient};
use crate::time_utils::now_rfc3339;

/// Most messages returned by a history fetch.
pub const MAX_HISTORY: u32 = 50;

/// Chat service.
#[derive(Clone)]
pub struct ChatService {
    db: Database,
    llm: LlmClient,
}

/// Both sides of one assistant exchange, as stored.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub user_message: ChatMessage,
    pub assistant_message: ChatMessage,
}

impl ChatService {
    pub fn new(db: Database, llm: LlmClient) -> Self {
        Self { db, llm }
    }

    /// Newest-first history for a user, capped at [`MAX_HISTORY`].
    ///
    /// A limit of zero yields an empty list.
    pub async fn history(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ChatMessage>, AppError> {
        let limit = limit.unwrap_or(MAX_HISTORY).min(MAX_HISTORY);
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.db.get_chat_history(user_id, limit).await
    }

    /// Append a message to a user's history.
    pub async fn send(
        &self,
        user_id: &str,
        message: &str,
        role: ChatRole,
    ) -> Result<ChatMessage, AppError> {
        if message.trim().is_empty() {
            return Err(AppError::BadRequest("Message is required".to_string()));
        }

        let chat = new_message(user_id, message, role);
        self.db.add_chat_message(&chat).await?;
        Ok(chat)
    }

    /// Delete a message owned by `user_id`.
    pub async fn delete(&self, user_id: &str, chat_id: &str) -> Result<(), AppError> {
        let chat = self
            .db
            .get_chat_message(chat_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Message not found".to_string()))?;

        if chat.user_id != user_id {
            tracing::warn!(
                user_id,
                chat_id,
                "Blocked deletion of another user's chat message"
            );
            return Err(AppError::Forbidden(
                "Not authorized to delete this message".to_string(),
            ));
        }

        self.db.delete_chat_message(chat_id).await?;
        tracing::debug!(user_id, chat_id, "Chat message deleted");
        Ok(())
    }

    /// Relay a conversation to the LLM, prepending the system prompt when
    /// the conversation does not start with one.
    pub async fn complete(
        &self,
        messages: Vec<CompletionMessage>,
    ) -> Result<serde_json::Value, AppError> {
        let messages = with_system_prompt(messages);
        self.llm.chat_completion(&messages).await
    }

    /// Ask the assistant a question in the context of the user's history.
    ///
    /// Nothing is stored unless the LLM call succeeds.
    pub async fn ask(&self, user_id: &str, message: &str) -> Result<Exchange, AppError> {
        if message.trim().is_empty() {
            return Err(AppError::BadRequest("Message is required".to_string()));
        }

        // History comes back newest first.
        let history = self.history(user_id, None).await?;
        let mut conversation: Vec<CompletionMessage> =
            history.iter().rev().map(CompletionMessage::from).collect();
        conversation.push(CompletionMessage::new(ChatRole::User.as_str(), message));

        let user_message = new_message(user_id, message, ChatRole::User);

        let response = self.complete(conversation).await?;
        let reply = first_choice_content(&response).ok_or_else(|| {
            AppError::LlmApi("Completion response had no message content".to_string())
        })?;

        let assistant_message = new_message(user_id, reply, ChatRole::Assistant);
        self.db.add_chat_message(&user_message).await?;
        self.db.add_chat_message(&assistant_message).await?;

        Ok(Exchange {
            user_message,
            assistant_message,
        })
    }
}

fn new_message(user_id: &str, message: &str, role: ChatRole) -> ChatMessage {
    ChatMessage {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        message: message.to_string(),
        role,
        timestamp: now_rfc3339(),
    }
}
