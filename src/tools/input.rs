//! Strongly typed tool inputs

use super::{AnalyzeImageTool, DecodeCaesarTool, Tool, ToolFailure};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Input for the `decode_caesar` tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeCaesarInput {
    pub text: String,
    #[serde(deserialize_with = "whole_number")]
    pub shift: i64,
}

/// Input for the `analyze_image` tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeImageInput {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// One variant per tool; decoding fails closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInput {
    DecodeCaesar(DecodeCaesarInput),
    AnalyzeImage(AnalyzeImageInput),
}

impl ToolInput {
    /// Validate `value` against the named tool's input shape.
    pub fn decode(name: &str, value: Value) -> Result<Self, ToolFailure> {
        if name == DecodeCaesarTool.name() {
            parse(name, value).map(ToolInput::DecodeCaesar)
        } else if name == AnalyzeImageTool.name() {
            parse(name, value).map(ToolInput::AnalyzeImage)
        } else {
            Err(ToolFailure::UnknownTool {
                name: name.to_string(),
            })
        }
    }

    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolInput::DecodeCaesar(_) => DecodeCaesarTool.name(),
            ToolInput::AnalyzeImage(_) => AnalyzeImageTool.name(),
        }
    }
}

/// Models sometimes emit integers as `3.0`; accept any whole JSON number.
#[allow(clippy::float_cmp, clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = Number::deserialize(deserializer)?;
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    match number.as_f64() {
        Some(f) if f.trunc() == f && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(de::Error::custom(format!(
            "expected a whole number, got {number}"
        ))),
    }
}

fn parse<T: DeserializeOwned>(tool: &str, value: Value) -> Result<T, ToolFailure> {
    serde_json::from_value(value).map_err(|e| ToolFailure::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}
