//! Fixed story text for the ORION campaign

use crate::message::{ChatMessage, ChatRole};
use crate::state_machine::GameState;

/// Game master persona; the current state snapshot is appended per turn
const GAME_MASTER_PROMPT: &str = "You are ORION Game Master, narrating a dark sci-fi interactive fiction in second person. Stay in narrative style, never reveal meta details.";

/// Opening scene, ending on the scrambled signal for the first cipher
pub const OPENING_NARRATION: &str = "Night claws at the high-rise windows. Neon adverts blink \"ORION CARES\" in sickly teal. You dozed off at your desk\u{2014}until your terminal bursts to life.\n\n\u{2588} UNAUTHORIZED SIGNAL \u{2588}\n\u{2026}incoming\u{2026}\n\n`jxu evviuj veh jxu iuuj...` _blinks on the screen\u{2014}scrambled text that begs to be decoded._";

/// Appended to the narration on the turn Act I completes
pub const ACT_TWO_TRANSITION: &str = "Alarms erupt overhead. Red strobes paint the hall. You sprint; doors auto-seal behind you. At Elevator Bay 4 the panel blinks > ENTER ACCESS CODE.\nYou key NODE17. The lift doors sigh open\u{2014}revealing darkness below.\n\n\u{2500}\u{2500}\u{2500} ACT II: INFILTRATION \u{2500}\u{2500}\u{2500}";

/// Instruction sent alongside images to the vision model
pub const IMAGE_ANALYSIS_INSTRUCTION: &str = "Analyze the image for hidden codes or QR values. Respond with only the extracted text or URL if found, else say 'NO_CODE'.";

/// System prompt conditioned on the ground-truth state
pub fn system_prompt(state: &GameState) -> String {
    let snapshot = serde_json::to_string(state).unwrap_or_else(|_| "{}".to_string());
    format!("{GAME_MASTER_PROMPT} Current game state: {snapshot}.")
}

/// First transcript entry of a new game
pub fn opening_message() -> ChatMessage {
    ChatMessage {
        id: "msg-0".to_string(),
        ..ChatMessage::new(ChatRole::Narrator, OPENING_NARRATION)
    }
}
