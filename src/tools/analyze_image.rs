//! Image analysis tool backed by a vision-capable model

use super::{AnalyzeImageInput, Tool, ToolContext, ToolFailure, ToolOutput};
use crate::content::IMAGE_ANALYSIS_INSTRUCTION;
use crate::llm::{ContentBlock, LlmMessage, LlmRequest, MessageRole};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{json, Value};

/// Maximum decoded size of an inline image (5MB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Asks the vision model for any code hidden in an image
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyzeImageTool;

impl AnalyzeImageTool {
    /// Accept public http(s) URLs and base64 `data:image/*` URIs only
    fn validate_url(url: &str) -> Result<(), String> {
        if url.starts_with("https://") || url.starts_with("http://") {
            return Ok(());
        }

        let Some(rest) = url.strip_prefix("data:") else {
            return Err("imageUrl must be an http(s) URL or a data URI".to_string());
        };
        let Some((header, payload)) = rest.split_once(',') else {
            return Err("data URI has no payload".to_string());
        };
        let Some(media_type) = header.strip_suffix(";base64") else {
            return Err("data URI must be base64 encoded".to_string());
        };
        if !media_type.starts_with("image/") {
            return Err(format!("unsupported media type: {media_type}"));
        }

        let bytes = BASE64
            .decode(payload)
            .map_err(|e| format!("invalid base64 payload: {e}"))?;
        if bytes.len() > MAX_IMAGE_SIZE {
            return Err(format!(
                "image too large: {} bytes (max {MAX_IMAGE_SIZE} bytes)",
                bytes.len()
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Tool for AnalyzeImageTool {
    type Input = AnalyzeImageInput;

    fn name(&self) -> &'static str {
        "analyze_image"
    }

    fn description(&self) -> &'static str {
        "Analyze an image URL for hidden codes or QR values and return any extracted text/code or 'NO_CODE' if nothing found."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["imageUrl"],
            "properties": {
                "imageUrl": {
                    "type": "string",
                    "description": "Publicly accessible image URL"
                }
            }
        })
    }

    async fn run(&self, input: AnalyzeImageInput, ctx: &ToolContext) -> ToolOutput {
        if let Err(reason) = Self::validate_url(&input.image_url) {
            return ToolOutput::failed(ToolFailure::InvalidArguments {
                tool: self.name().to_string(),
                reason,
            });
        }

        let request = LlmRequest::new(vec![LlmMessage {
            role: MessageRole::User,
            content: vec![
                ContentBlock::text(IMAGE_ANALYSIS_INSTRUCTION),
                ContentBlock::image_url(input.image_url),
            ],
        }]);

        match ctx.vision().complete(&request).await {
            Ok(response) => ToolOutput::success(response.text_content().trim()),
            Err(e) => ToolOutput::failed(ToolFailure::ExecutionFailed {
                tool: self.name().to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ImageSource, LlmError, LlmResponse};
    use crate::orchestrator::testing::MockLlmClient;
    use std::sync::Arc;

    fn input(url: &str) -> AnalyzeImageInput {
        AnalyzeImageInput {
            image_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_returns_trimmed_vision_text() {
        let vision = Arc::new(MockLlmClient::new("vision"));
        vision.queue_response(LlmResponse::text("  NODE17 \n"));
        let ctx = ToolContext::new(vision.clone());

        let output = AnalyzeImageTool
            .run(input("https://example.com/badge.png"), &ctx)
            .await;
        assert!(output.is_success());
        assert_eq!(output.text, "NODE17");
        assert_eq!(output.event, None);

        let requests = vision.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].tools.is_empty());
        let blocks = &requests[0].messages[0].content;
        assert!(matches!(
            &blocks[0],
            ContentBlock::Text { text } if text == IMAGE_ANALYSIS_INSTRUCTION
        ));
        assert!(matches!(
            &blocks[1],
            ContentBlock::Image { source: ImageSource::Url { url } }
                if url == "https://example.com/badge.png"
        ));
    }

    #[tokio::test]
    async fn test_empty_vision_reply_is_empty_result() {
        let vision = Arc::new(MockLlmClient::new("vision"));
        vision.queue_response(LlmResponse {
            content: vec![],
            end_turn: true,
            usage: crate::llm::Usage::default(),
        });
        let ctx = ToolContext::new(vision);

        let output = AnalyzeImageTool
            .run(input("data:image/png;base64,iVBORw0KGgo="), &ctx)
            .await;
        assert!(output.is_success());
        assert_eq!(output.text, "");
    }

    #[tokio::test]
    async fn test_vision_failure_is_recoverable() {
        let vision = Arc::new(MockLlmClient::new("vision"));
        vision.queue_error(LlmError::timeout("slow"));
        let ctx = ToolContext::new(vision);

        let output = AnalyzeImageTool
            .run(input("https://example.com/a.png"), &ctx)
            .await;
        assert_eq!(output.text, "ERROR executing tool");
        assert!(matches!(
            output.failure,
            Some(ToolFailure::ExecutionFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_bad_url_never_reaches_model() {
        let vision = Arc::new(MockLlmClient::new("vision"));
        let ctx = ToolContext::new(vision.clone());

        for url in [
            "ftp://example.com/a.png",
            "data:text/plain;base64,aGVsbG8=",
            "data:image/png,rawbytes",
            "data:image/png;base64,@@@",
        ] {
            let output = AnalyzeImageTool.run(input(url), &ctx).await;
            assert!(
                matches!(output.failure, Some(ToolFailure::InvalidArguments { .. })),
                "accepted {url}"
            );
        }
        assert!(vision.recorded_requests().is_empty());
    }

    #[test]
    fn test_oversized_data_uri_rejected() {
        let payload = BASE64.encode(vec![0u8; MAX_IMAGE_SIZE + 1]);
        let url = format!("data:image/png;base64,{payload}");
        assert!(AnalyzeImageTool::validate_url(&url).is_err());
    }
}
