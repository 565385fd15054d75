//! API request and response types

use crate::message::ChatMessage;
use crate::state_machine::GameState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to play one turn
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub state: GameState,
}

/// Narration and the state to persist for the next turn
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub content: String,
    pub state: GameState,
}

/// Request to run a tool directly, bypassing the model
#[derive(Debug, Deserialize)]
pub struct ToolRequest {
    pub tool: String,
    #[serde(default)]
    pub args: Value,
    /// When present, the response carries the state with any unlocked flags
    #[serde(default)]
    pub state: Option<GameState>,
}

/// Response for a direct tool call
#[derive(Debug, Serialize)]
pub struct ToolResponse {
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<GameState>,
}

/// Version information
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub name: &'static str,
    pub version: &'static str,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
