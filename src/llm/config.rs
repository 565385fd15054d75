//! Provider configuration read from the environment

use super::{LlmError, LlmService, LoggingService, OpenAIService, TimeoutService};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the inference gateway
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub openai_api_key: Option<String>,
    /// OpenAI-compatible gateway base URL; when set, no API key is needed
    pub gateway: Option<String>,
    /// Model used for narration
    pub model: String,
    /// Model used by `analyze_image`
    pub vision_model: String,
    /// Upper bound on every gateway call
    pub timeout: Duration,
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            gateway: None,
            model: DEFAULT_MODEL.to_string(),
            vision_model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: None,
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let model = lookup("ORION_MODEL")
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let vision_model = lookup("ORION_VISION_MODEL")
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| model.clone());
        let timeout_secs = lookup("ORION_LLM_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            openai_api_key: lookup("OPENAI_API_KEY").filter(|k| !k.is_empty()),
            gateway: lookup("LLM_GATEWAY").filter(|g| !g.is_empty()),
            model,
            vision_model,
            timeout: Duration::from_secs(timeout_secs),
            max_tokens: lookup("ORION_MAX_TOKENS").and_then(|s| s.parse().ok()),
        }
    }

    /// Service used for narration turns
    pub fn chat_service(&self) -> Result<Arc<dyn LlmService>, LlmError> {
        self.build(&self.model)
    }

    /// Service used for image analysis
    pub fn vision_service(&self) -> Result<Arc<dyn LlmService>, LlmError> {
        self.build(&self.vision_model)
    }

    fn api_key(&self) -> Result<String, LlmError> {
        // In gateway mode the gateway handles the actual authentication
        if self.gateway.is_some() {
            return Ok("implicit".to_string());
        }
        self.openai_api_key
            .clone()
            .ok_or_else(|| LlmError::auth("OPENAI_API_KEY is not set and no LLM_GATEWAY configured"))
    }

    fn build(&self, model: &str) -> Result<Arc<dyn LlmService>, LlmError> {
        // Transport timeout sits just above the service bound so the
        // TimeoutService reports expiry first
        let transport_timeout = self.timeout + Duration::from_secs(5);
        let client = OpenAIService::new(
            self.api_key()?,
            model,
            self.gateway.as_deref(),
            transport_timeout,
        )?;
        let bounded = TimeoutService::new(Arc::new(client), self.timeout);
        Ok(Arc::new(LoggingService::new(Arc::new(bounded))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmErrorKind;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> LlmConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        LlmConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.vision_model, "gpt-4o-mini");
        assert_eq!(cfg.timeout, Duration::from_secs(60));
        assert!(cfg.max_tokens.is_none());
    }

    #[test]
    fn test_vision_model_follows_chat_model() {
        let cfg = config(&[("ORION_MODEL", "gpt-4o")]);
        assert_eq!(cfg.vision_model, "gpt-4o");

        let cfg = config(&[("ORION_MODEL", "gpt-4o"), ("ORION_VISION_MODEL", "gpt-4.1")]);
        assert_eq!(cfg.vision_model, "gpt-4.1");
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        assert_eq!(
            config(&[("ORION_LLM_TIMEOUT_SECS", "soon")]).timeout,
            Duration::from_secs(60)
        );
        assert_eq!(
            config(&[("ORION_LLM_TIMEOUT_SECS", "0")]).timeout,
            Duration::from_secs(60)
        );
        assert_eq!(
            config(&[("ORION_LLM_TIMEOUT_SECS", "15")]).timeout,
            Duration::from_secs(15)
        );
    }

    #[test]
    fn test_missing_key_is_auth_error() {
        let err = config(&[]).chat_service().err().unwrap();
        assert_eq!(err.kind, LlmErrorKind::Auth);
    }

    #[test]
    fn test_gateway_needs_no_key() {
        let cfg = config(&[("LLM_GATEWAY", "http://localhost:9999")]);
        let service = cfg.chat_service().unwrap();
        assert_eq!(service.model_id(), "gpt-4o-mini");
    }
}
