//! Tools the game master model can call mid-turn
//!
//! Tools are stateless: per-call dependencies arrive through [`ToolContext`].
//! The registry never panics and never returns `Err`; every failure becomes
//! a [`ToolOutput`] carrying a [`ToolFailure`] the model can narrate around.

mod analyze_image;
mod decode_caesar;
mod input;

pub use analyze_image::{AnalyzeImageTool, MAX_IMAGE_SIZE};
pub use decode_caesar::DecodeCaesarTool;
pub use input::{AnalyzeImageInput, DecodeCaesarInput, ToolInput};

use crate::llm::{LlmService, ToolDefinition};
use crate::state_machine::GameEvent;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Why a tool call produced no usable result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolFailure {
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },
    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
    #[error("{tool} failed: {reason}")]
    ExecutionFailed { tool: String, reason: String },
}

impl ToolFailure {
    /// Text handed back to the model in place of a result
    pub fn model_text(&self) -> &'static str {
        match self {
            ToolFailure::UnknownTool { .. } => "ERROR: Unknown tool",
            ToolFailure::InvalidArguments { .. } | ToolFailure::ExecutionFailed { .. } => {
                "ERROR executing tool"
            }
        }
    }
}

/// Result from tool execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// What the model sees as the tool result
    pub text: String,
    pub failure: Option<ToolFailure>,
    /// Game event the output implies; the caller decides whether to apply it
    pub event: Option<GameEvent>,
}

impl ToolOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failure: None,
            event: None,
        }
    }

    pub fn failed(failure: ToolFailure) -> Self {
        Self {
            text: failure.model_text().to_string(),
            failure: Some(failure),
            event: None,
        }
    }

    pub fn with_event(mut self, event: GameEvent) -> Self {
        self.event = Some(event);
        self
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// All context needed for a tool invocation.
#[derive(Clone)]
pub struct ToolContext {
    vision: Arc<dyn LlmService>,
}

impl ToolContext {
    pub fn new(vision: Arc<dyn LlmService>) -> Self {
        Self { vision }
    }

    /// Vision-capable model for image analysis
    pub fn vision(&self) -> &Arc<dyn LlmService> {
        &self.vision
    }
}

/// A tool with a typed, schema-validated input
#[async_trait]
pub trait Tool: Send + Sync {
    type Input: DeserializeOwned + Send;

    /// Tool name
    fn name(&self) -> &'static str;

    /// Tool description for LLM
    fn description(&self) -> &'static str;

    /// JSON schema for tool input
    fn input_schema(&self) -> Value;

    /// Execute with already-decoded input
    async fn run(&self, input: Self::Input, ctx: &ToolContext) -> ToolOutput;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// The fixed set of tools offered to the game master
#[derive(Default)]
pub struct ToolRegistry {
    decode_caesar: DecodeCaesarTool,
    analyze_image: AnalyzeImageTool,
}

impl ToolRegistry {
    pub fn standard() -> Self {
        Self::default()
    }

    /// Get all tool definitions for LLM
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            self.decode_caesar.definition(),
            self.analyze_image.definition(),
        ]
    }

    /// Decode `input` for the named tool and run it.
    pub async fn execute(&self, name: &str, input: Value, ctx: &ToolContext) -> ToolOutput {
        let decoded = match ToolInput::decode(name, input) {
            Ok(decoded) => decoded,
            Err(failure) => {
                tracing::warn!(tool = %name, error = %failure, "Rejected tool call");
                return ToolOutput::failed(failure);
            }
        };

        tracing::debug!(tool = decoded.tool_name(), "Dispatching tool");
        let output = match decoded {
            ToolInput::DecodeCaesar(input) => self.decode_caesar.run(input, ctx).await,
            ToolInput::AnalyzeImage(input) => self.analyze_image.run(input, ctx).await,
        };

        match &output.failure {
            None => tracing::info!(tool = %name, event = ?output.event, "Tool completed"),
            Some(failure) => tracing::warn!(tool = %name, error = %failure, "Tool failed"),
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::testing::MockLlmClient;
    use serde_json::json;

    fn test_context() -> ToolContext {
        ToolContext::new(Arc::new(MockLlmClient::new("vision")))
    }

    #[test]
    fn test_tools_registered() {
        let registry = ToolRegistry::standard();
        let defs = registry.definitions();
        let names: Vec<_> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["decode_caesar", "analyze_image"]);
        assert_eq!(defs[0].input_schema["required"], json!(["text", "shift"]));
        assert_eq!(defs[1].input_schema["required"], json!(["imageUrl"]));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::standard();
        let output = registry
            .execute("bogus_tool", json!({}), &test_context())
            .await;
        assert_eq!(output.text, "ERROR: Unknown tool");
        assert_eq!(
            output.failure,
            Some(ToolFailure::UnknownTool {
                name: "bogus_tool".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_missing_arguments() {
        let registry = ToolRegistry::standard();
        let output = registry
            .execute("decode_caesar", json!({"text": "abc"}), &test_context())
            .await;
        assert_eq!(output.text, "ERROR executing tool");
        assert!(matches!(
            output.failure,
            Some(ToolFailure::InvalidArguments { .. })
        ));
    }

    #[tokio::test]
    async fn test_decode_dispatch() {
        let registry = ToolRegistry::standard();
        let output = registry
            .execute(
                "decode_caesar",
                json!({"text": "Khoor", "shift": 3}),
                &test_context(),
            )
            .await;
        assert!(output.is_success());
        assert_eq!(output.text, "Hello");
        assert_eq!(output.event, None);
    }
}
