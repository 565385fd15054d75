//! Game progression state machine
//!
//! Pure transitions over [`GameState`] snapshots. The caller owns
//! persistence; nothing here performs I/O.

pub mod event;
pub mod state;
mod transition;
pub mod trigger;

#[cfg(test)]
mod proptests;

pub use event::GameEvent;
pub use state::GameState;
pub use transition::{apply, apply_all, check_act_transition};
