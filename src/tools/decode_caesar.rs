//! Caesar decoding tool for the opening signal

use super::{DecodeCaesarInput, Tool, ToolContext, ToolOutput};
use crate::cipher;
use crate::state_machine::trigger::contains_cipher_phrase;
use crate::state_machine::GameEvent;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Decodes Caesar-shifted text; flags the cipher as solved when the hidden
/// phrase comes out
#[derive(Debug, Default, Clone, Copy)]
pub struct DecodeCaesarTool;

#[async_trait]
impl Tool for DecodeCaesarTool {
    type Input = DecodeCaesarInput;

    fn name(&self) -> &'static str {
        "decode_caesar"
    }

    fn description(&self) -> &'static str {
        "Decode Caesar cipher with given shift"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["text", "shift"],
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Ciphertext to decode"
                },
                "shift": {
                    "type": "integer",
                    "description": "Shift value used during encoding (positive integer)"
                }
            }
        })
    }

    async fn run(&self, input: DecodeCaesarInput, _ctx: &ToolContext) -> ToolOutput {
        let decoded = cipher::decode(&input.text, input.shift);
        let solved = contains_cipher_phrase(&decoded);
        let output = ToolOutput::success(decoded);
        if solved {
            output.with_event(GameEvent::Cipher1Solved)
        } else {
            output
        }
    }
}
