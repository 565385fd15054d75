//! ORION - turn orchestration engine for a narrative puzzle game
//!
//! Accepts the player's transcript and game state, lets the game-master
//! model narrate (optionally calling a tool), and returns narration plus
//! the updated state.

mod api;
mod cipher;
mod content;
mod llm;
mod message;
mod orchestrator;
mod state_machine;
mod tools;

use api::{create_router, AppState};
use llm::LlmConfig;
use orchestrator::TurnOrchestrator;
use std::net::SocketAddr;
use std::sync::Arc;
use tools::{ToolContext, ToolRegistry};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orion_engine=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let port: u16 = std::env::var("ORION_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    // Inference gateway
    let llm_config = LlmConfig::from_env();
    let chat = llm_config.chat_service().inspect_err(|e| {
        tracing::error!(error = %e, "No inference gateway configured. Set OPENAI_API_KEY or LLM_GATEWAY.");
    })?;
    let vision = llm_config.vision_service()?;

    tracing::info!(
        model = %chat.model_id(),
        vision_model = %vision.model_id(),
        timeout_secs = llm_config.timeout.as_secs(),
        gateway = ?llm_config.gateway,
        "Inference gateway initialized"
    );

    let orchestrator = TurnOrchestrator::new(
        chat,
        Arc::new(ToolRegistry::standard()),
        ToolContext::new(vision),
    )
    .with_max_tokens(llm_config.max_tokens);

    let state = AppState::new(orchestrator);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("ORION server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
