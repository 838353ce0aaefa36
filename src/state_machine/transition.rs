//! Pure routing between turn nodes
//!
//! None of these functions perform I/O; the turn machine in `runtime` calls
//! them after each node to pick the next one.

use super::{ConversationState, TurnNode};
use crate::message::{AiDecision, Message, TRANSFER_TOOL};

/// Next node after the model produced `decision`.
///
/// A respond call or a plain-text decision ends the turn; anything else
/// needs its tools executed.
pub fn route_after_agent(decision: &AiDecision) -> TurnNode {
    if decision.is_plain() || decision.respond_call().is_some() {
        TurnNode::ExtractResponse
    } else {
        TurnNode::Tools
    }
}

/// Next node after the tools of one decision ran.
///
/// `round_start` is the message index where this round's tool results begin.
/// A pending order-status handoff or an executed transfer call ends the turn.
pub fn route_after_tools(state: &ConversationState, round_start: usize) -> TurnNode {
    if state.pending_transfer.is_some() {
        return TurnNode::ExtractResponse;
    }
    let transferred = state
        .messages
        .get(round_start..)
        .unwrap_or_default()
        .iter()
        .any(|m| m.is_tool_result_of(TRANSFER_TOOL));
    if transferred {
        TurnNode::ExtractResponse
    } else {
        TurnNode::Agent
    }
}

/// Whether the controller should run another pass over `messages`.
pub fn should_continue(messages: &[Message]) -> bool {
    match messages.last() {
        None => false,
        Some(Message::Tool(result)) => result.name != TRANSFER_TOOL,
        Some(Message::Ai(decision)) => {
            !decision.is_plain() && decision.respond_call().is_none()
        }
        Some(Message::Human { .. }) => true,
    }
}
