//! Answer extraction for the terminal node

use super::{ConversationState, DEFAULT_ANSWER, TRANSFER_TAG};
use crate::message::{Message, TRANSFER_TOOL};

/// How many trailing messages are searched for an executed transfer
const TRANSFER_LOOKBACK: usize = 3;

/// The turn's resolved answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub product_ids: Option<Vec<String>>,
    pub tool_tag: Option<String>,
}

fn resolve(state: &ConversationState) -> Answer {
    if let Some(transfer) = &state.pending_transfer {
        return Answer {
            text: transfer.message.clone(),
            product_ids: None,
            tool_tag: Some(TRANSFER_TAG.to_string()),
        };
    }

    let tail = state.messages.len().saturating_sub(TRANSFER_LOOKBACK);
    if state.messages[tail..]
        .iter()
        .any(|m| m.is_tool_result_of(TRANSFER_TOOL))
    {
        return Answer {
            text: String::new(),
            product_ids: None,
            tool_tag: Some(TRANSFER_TAG.to_string()),
        };
    }

    if let Some(call) = state
        .last()
        .and_then(Message::as_decision)
        .and_then(|d| d.respond_call())
    {
        let input = call.respond_input();
        return Answer {
            text: input.message,
            product_ids: input.product_ids_to_show.filter(|ids| !ids.is_empty()),
            tool_tag: None,
        };
    }

    Answer {
        text: DEFAULT_ANSWER.to_string(),
        product_ids: None,
        tool_tag: None,
    }
}

/// Resolve the answer in priority order (pending handoff, executed transfer,
/// respond call, default) and record it on the state: the answer is appended
/// as plain assistant text and the product ids and tag are set.
pub fn extract_response(state: &mut ConversationState) -> Answer {
    let answer = resolve(state);
    state.push(Message::ai_text(answer.text.clone()));
    if answer.product_ids.is_some() {
        state.product_ids_to_show.clone_from(&answer.product_ids);
    }
    if answer.tool_tag.is_some() {
        state.tool_call_tag.clone_from(&answer.tool_tag);
    }
    answer
}

/// The answer a settled history already ends with. Nothing is recorded on
/// the state.
pub fn standing_answer(state: &ConversationState) -> Answer {
    match state.last().and_then(Message::as_decision) {
        Some(decision) if decision.is_plain() => Answer {
            text: decision.content.clone(),
            product_ids: None,
            tool_tag: None,
        },
        _ => resolve(state),
    }
}
