//! Events that advance the game

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbolic triggers consumed by [`super::apply`].
///
/// Adding a puzzle means adding a variant here, its effect in the
/// transition table, and the detector that raises it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEvent {
    #[serde(rename = "cipher1_solved")]
    Cipher1Solved,
    #[serde(rename = "puzzle2_solved")]
    Puzzle2Solved,
    SecureChannelOpen,
    /// Any tag this build does not know; applying it changes nothing
    #[serde(other)]
    Unrecognized,
}

impl GameEvent {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Cipher1Solved => "cipher1_solved",
            Self::Puzzle2Solved => "puzzle2_solved",
            Self::SecureChannelOpen => "secure_channel_open",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
