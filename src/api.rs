//! HTTP API for the game engine
//!
//! Thin adapter between the UI collaborator's JSON and the orchestrator.

mod handlers;
mod types;

pub use handlers::create_router;

use crate::orchestrator::TurnOrchestrator;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<TurnOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: TurnOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}
