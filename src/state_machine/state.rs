//! Game state snapshot

use serde::{Deserialize, Serialize};

/// Flat record of narrative progress flags.
///
/// Round-trips verbatim through the UI collaborator. Absent fields default
/// to false / zero so partially written snapshots still parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub act: u32,
    pub cipher1_active: bool,
    pub cipher1_solved: bool,
    pub have_drive: bool,
    pub puzzle2_solved: bool,
    pub secure_channel_open: bool,
}

impl GameState {
    /// State at the start of a fresh game: Act I with the opening cipher live.
    pub fn new_game() -> Self {
        Self {
            act: 1,
            cipher1_active: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_fields_default_to_falsy() {
        let state: GameState = serde_json::from_value(json!({})).unwrap();
        assert_eq!(state, GameState::default());
        assert_eq!(state.act, 0);
    }

    #[test]
    fn test_partial_snapshot_parses() {
        let state: GameState =
            serde_json::from_value(json!({"act": 1, "cipher1_active": true})).unwrap();
        assert_eq!(state, GameState::new_game());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let state: GameState =
            serde_json::from_value(json!({"act": 2, "legacy_flag": true})).unwrap();
        assert_eq!(state.act, 2);
    }

    #[test]
    fn test_serializes_every_field() {
        let value = serde_json::to_value(GameState::new_game()).unwrap();
        assert_eq!(
            value,
            json!({
                "act": 1,
                "cipher1_active": true,
                "cipher1_solved": false,
                "have_drive": false,
                "puzzle2_solved": false,
                "secure_channel_open": false
            })
        );
    }
}
