//! Pure state transition functions
//!
//! Given the same inputs these always produce the same outputs, with no I/O.

use super::{GameEvent, GameState};

/// Apply a single event, returning the next snapshot.
///
/// Flags are one-way latches: no event clears a flag except `cipher1_active`,
/// which goes false exactly when the cipher is solved.
pub fn apply(state: &GameState, event: GameEvent) -> GameState {
    let mut next = *state;
    match event {
        GameEvent::Cipher1Solved => {
            next.cipher1_solved = true;
            next.cipher1_active = false;
        }
        GameEvent::Puzzle2Solved => {
            next.puzzle2_solved = true;
            next.have_drive = true;
        }
        GameEvent::SecureChannelOpen => {
            next.secure_channel_open = true;
        }
        GameEvent::Unrecognized => {}
    }
    next
}

/// Fold a sequence of events over a snapshot in order.
pub fn apply_all(state: &GameState, events: impl IntoIterator<Item = GameEvent>) -> GameState {
    events
        .into_iter()
        .fold(*state, |acc, event| apply(&acc, event))
}

/// Act I ends once all three of its puzzles are done.
pub fn act_one_complete(state: &GameState) -> bool {
    state.act == 1 && state.cipher1_solved && state.puzzle2_solved && state.secure_channel_open
}

/// Advance to Act II if Act I just completed.
///
/// Returns `None` when no transition applies. Because the result has
/// `act == 2`, feeding it back in never fires again.
pub fn check_act_transition(state: &GameState) -> Option<GameState> {
    act_one_complete(state).then(|| GameState { act: 2, ..*state })
}
