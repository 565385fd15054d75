//! Detectors that turn free text into [`GameEvent`]s
//!
//! Detection is separate from application: tools and handlers report what
//! they saw, and the orchestrator decides what to apply.

use super::GameEvent;
use regex::Regex;
use std::sync::LazyLock;

/// Phrase hidden in the opening cipher
pub const CIPHER_SUCCESS_PHRASE: &str = "elevator has the key";

/// Keypad code the player finds for the second puzzle
pub const PUZZLE2_CODE: &str = "9482";

/// Access code recovered from the uploaded image
pub const ACCESS_CODE: &str = "NODE17";

// ASCII word boundaries: non-ASCII letters next to the code still count as a break
static PUZZLE2_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?-u:\b){PUZZLE2_CODE}(?-u:\b)")).expect("valid pattern")
});

static ACCESS_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?i){ACCESS_CODE}")).expect("valid pattern"));

/// Check a player message for an answer the engine can grade without the model.
pub fn detect_direct_input(text: &str) -> Option<GameEvent> {
    PUZZLE2_PATTERN
        .is_match(text)
        .then_some(GameEvent::Puzzle2Solved)
}

/// Whether decoded cipher output contains the success phrase (any case).
pub fn contains_cipher_phrase(text: &str) -> bool {
    text.to_lowercase().contains(CIPHER_SUCCESS_PHRASE)
}

/// Check image-analysis output for the secure channel access code.
pub fn detect_access_code(text: &str) -> Option<GameEvent> {
    ACCESS_CODE_PATTERN
        .is_match(text)
        .then_some(GameEvent::SecureChannelOpen)
}
