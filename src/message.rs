//! Chat history as exchanged with the UI collaborator

use crate::llm::{LlmMessage, MessageRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message in the game transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
    System,
    /// In-fiction companion voice
    Ally,
    /// Scene-setting prose
    Narrator,
}

impl ChatRole {
    /// Collapse to the roles the inference gateway understands
    pub fn gateway_role(self) -> MessageRole {
        match self {
            ChatRole::User => MessageRole::User,
            ChatRole::System => MessageRole::System,
            ChatRole::Assistant | ChatRole::Ally | ChatRole::Narrator => MessageRole::Assistant,
        }
    }
}

/// A single transcript entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn to_llm_message(&self) -> LlmMessage {
        LlmMessage::text(self.role.gateway_role(), self.content.clone())
    }
}

/// The most recent message the player wrote, if any
pub fn last_user_message(history: &[ChatMessage]) -> Option<&ChatMessage> {
    history.iter().rev().find(|m| m.role == ChatRole::User)
}
