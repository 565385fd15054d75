//! Turn orchestration
//!
//! One turn runs:
//!
//! 1. direct detection of answers in the latest player message
//! 2. a first model call offering the tools
//! 3. at most one tool dispatch, if the model asked for it
//! 4. a second model call that sees the tool exchange (only after 3)
//! 5. the Act I completion check
//!
//! The orchestrator keeps nothing between turns. State comes in as a
//! snapshot and a new snapshot goes out, or nothing on failure.

#[cfg(test)]
pub(crate) mod testing;

use crate::content::{system_prompt, ACT_TWO_TRANSITION};
use crate::llm::{ContentBlock, LlmError, LlmMessage, LlmRequest, LlmResponse, LlmService, MessageRole, ToolUse};
use crate::message::{last_user_message, ChatMessage};
use crate::state_machine::{self, trigger, GameEvent, GameState};
use crate::tools::{ToolContext, ToolOutput, ToolRegistry};
use std::sync::Arc;
use thiserror::Error;

/// Result of a completed turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub narration: String,
    pub state: GameState,
    /// Events applied during the turn, in order
    pub events: Vec<GameEvent>,
}

/// Errors that abort a turn; the caller keeps its previous snapshot
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("inference gateway failed: {0}")]
    Gateway(#[from] LlmError),
}

/// Snapshot plus the events that produced it, local to one turn
struct TurnProgress {
    state: GameState,
    events: Vec<GameEvent>,
}

impl TurnProgress {
    fn new(state: GameState) -> Self {
        Self {
            state,
            events: Vec::new(),
        }
    }

    fn raise(&mut self, event: GameEvent) {
        tracing::info!(%event, "Game event raised");
        self.state = state_machine::apply(&self.state, event);
        self.events.push(event);
    }
}

/// Drives the two-phase model protocol for a single turn
pub struct TurnOrchestrator {
    llm: Arc<dyn LlmService>,
    tools: Arc<ToolRegistry>,
    tool_context: ToolContext,
    max_tokens: Option<u32>,
}

impl TurnOrchestrator {
    pub fn new(llm: Arc<dyn LlmService>, tools: Arc<ToolRegistry>, tool_context: ToolContext) -> Self {
        Self {
            llm,
            tools,
            tool_context,
            max_tokens: None,
        }
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn tool_context(&self) -> &ToolContext {
        &self.tool_context
    }

    /// Run one turn over `history` starting from `state`.
    #[tracing::instrument(
        name = "turn",
        skip_all,
        fields(turn_id = %uuid::Uuid::new_v4(), act = state.act, history_len = history.len())
    )]
    pub async fn run_turn(
        &self,
        history: &[ChatMessage],
        state: GameState,
    ) -> Result<TurnOutcome, TurnError> {
        let mut progress = TurnProgress::new(state);

        // Known answers are graded before the model sees the turn
        if let Some(event) = detect_direct_input(history, &progress.state) {
            progress.raise(event);
        }

        let first_request = LlmRequest::new(history.iter().map(ChatMessage::to_llm_message).collect())
            .with_system(system_prompt(&progress.state))
            .with_tools(self.tools.definitions())
            .with_max_tokens(self.max_tokens);
        let first_response = self.llm.complete(&first_request).await?;

        let narration = match select_tool_use(&first_response) {
            None => narration_text(&first_response),
            Some(tool_use) => {
                let output = self
                    .tools
                    .execute(&tool_use.name, tool_use.input.clone(), &self.tool_context)
                    .await;
                if let Some(event) = output.event {
                    progress.raise(event);
                }

                let second_request = follow_up_request(first_request, &first_response, &tool_use, &output);
                narration_text(&self.llm.complete(&second_request).await?)
            }
        };

        let narration = match state_machine::check_act_transition(&progress.state) {
            Some(advanced) => {
                tracing::info!(from = progress.state.act, to = advanced.act, "Act transition");
                progress.state = advanced;
                format!("{narration}\n\n{ACT_TWO_TRANSITION}")
            }
            None => narration,
        };

        tracing::info!(events = ?progress.events, act = progress.state.act, "Turn complete");
        Ok(TurnOutcome {
            narration,
            state: progress.state,
            events: progress.events,
        })
    }
}

fn detect_direct_input(history: &[ChatMessage], state: &GameState) -> Option<GameEvent> {
    if state.puzzle2_solved {
        return None;
    }
    last_user_message(history).and_then(|m| trigger::detect_direct_input(&m.content))
}

/// Text of a narrating response. A reply that stopped early is still used.
fn narration_text(response: &LlmResponse) -> String {
    if !response.end_turn {
        tracing::warn!(
            output_tokens = response.usage.output_tokens,
            "Narration ended before the model finished its reply"
        );
    }
    response.text_content()
}

/// Only one tool call is honored per turn
fn select_tool_use(response: &LlmResponse) -> Option<ToolUse> {
    let mut uses = response.tool_uses().into_iter();
    let first = uses.next()?;
    let ignored: Vec<String> = uses.map(|u| u.name).collect();
    if !ignored.is_empty() {
        tracing::warn!(honored = %first.name, ?ignored, "Ignoring extra tool calls");
    }
    Some(first)
}

/// The first request's messages, then the assistant's tool call, then the
/// tool result. No tools are offered so the model must narrate.
fn follow_up_request(
    first_request: LlmRequest,
    first_response: &LlmResponse,
    tool_use: &ToolUse,
    output: &ToolOutput,
) -> LlmRequest {
    let mut assistant_content: Vec<ContentBlock> = first_response
        .content
        .iter()
        .filter(|block| matches!(block, ContentBlock::Text { .. }))
        .cloned()
        .collect();
    assistant_content.push(ContentBlock::tool_use(
        tool_use.id.clone(),
        tool_use.name.clone(),
        tool_use.input.clone(),
    ));

    let LlmRequest {
        system,
        mut messages,
        max_tokens,
        ..
    } = first_request;
    messages.push(LlmMessage {
        role: MessageRole::Assistant,
        content: assistant_content,
    });
    messages.push(LlmMessage {
        role: MessageRole::User,
        content: vec![ContentBlock::tool_result(
            tool_use.id.clone(),
            output.text.clone(),
            !output.is_success(),
        )],
    });

    LlmRequest {
        system,
        messages,
        ..LlmRequest::new(Vec::new())
    }
    .with_max_tokens(max_tokens)
}
