//! HTTP request handlers

use super::types::{
    ChatRequest, ChatResponse, ErrorResponse, ToolRequest, ToolResponse, VersionResponse,
};
use super::AppState;
use crate::content;
use crate::message::ChatMessage;
use crate::state_machine::{self, trigger, GameState};
use crate::tools::{ToolFailure, MAX_IMAGE_SIZE};
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Direct tool calls carry whole data-URI images: base64 grows them by 4/3,
/// plus headroom for the JSON envelope and state
const TOOL_BODY_LIMIT: usize = MAX_IMAGE_SIZE.div_ceil(3) * 4 + 1024 * 1024;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // One game turn
        .route("/api/chat", post(chat_turn))
        // Direct tool invocation (image upload flow)
        .route(
            "/api/tools",
            post(invoke_tool).layer(DefaultBodyLimit::max(TOOL_BODY_LIMIT)),
        )
        // Fresh game bootstrap
        .route("/api/state/new", get(new_game_state))
        .route("/api/opening", get(opening_message))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Turns
// ============================================================

async fn chat_turn(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    // Reject before any model call
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let outcome = state
        .orchestrator
        .run_turn(&req.messages, req.state)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Turn failed");
            AppError::Internal("Chat error".to_string())
        })?;

    Ok(Json(ChatResponse {
        content: outcome.narration,
        state: outcome.state,
    }))
}

// ============================================================
// Direct Tools
// ============================================================

async fn invoke_tool(
    State(state): State<AppState>,
    payload: Result<Json<ToolRequest>, JsonRejection>,
) -> Result<Json<ToolResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let orchestrator = &state.orchestrator;
    let output = orchestrator
        .tools()
        .execute(&req.tool, req.args, orchestrator.tool_context())
        .await;

    if let Some(failure) = output.failure {
        return Err(match failure {
            ToolFailure::UnknownTool { .. } => AppError::BadRequest("Unknown tool".to_string()),
            ToolFailure::InvalidArguments { .. } => AppError::BadRequest(failure.to_string()),
            ToolFailure::ExecutionFailed { .. } => AppError::Internal("Internal error".to_string()),
        });
    }

    // Same transition the UI applies to its local copy
    let state = req.state.map(|current| {
        let events = output
            .event
            .into_iter()
            .chain(trigger::detect_access_code(&output.text));
        state_machine::apply_all(&current, events)
    });

    Ok(Json(ToolResponse {
        result: output.text,
        state,
    }))
}

// ============================================================
// Bootstrap
// ============================================================

async fn new_game_state() -> Json<GameState> {
    Json(GameState::new_game())
}

async fn opening_message() -> Json<ChatMessage> {
    Json(content::opening_message())
}

async fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
