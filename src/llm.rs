//! Inference gateway abstraction
//!
//! The orchestrator and tools only see [`LlmService`]; the concrete client is
//! constructed at startup and injected, so tests can swap in a mock.

mod config;
mod error;
mod openai;
mod types;

pub use config::LlmConfig;
pub use error::LlmError;
#[cfg(test)]
pub use error::LlmErrorKind;
pub use openai::OpenAIService;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Common interface for inference providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Make a completion request
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    tool_calls = response.tool_uses().len(),
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = ?e.kind,
                    retryable = e.kind.is_retryable(),
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Bounds every request so a stalled provider cannot hang a turn
pub struct TimeoutService {
    inner: Arc<dyn LlmService>,
    limit: Duration,
}

impl TimeoutService {
    pub fn new(inner: Arc<dyn LlmService>, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl LlmService for TimeoutService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        match tokio::time::timeout(self.limit, self.inner.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::timeout(format!(
                "No response from {} within {}s",
                self.inner.model_id(),
                self.limit.as_secs_f32()
            ))),
        }
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}
