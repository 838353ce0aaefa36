//! Commit filter for messages produced during a turn

use crate::message::{Message, ToolCall, RESPOND_TOOL};

/// Whether a newly produced message should be written to history.
///
/// A respond call is never stored as a tool call; its extracted plain-text
/// answer is stored instead. Transfer calls and their results are always
/// stored. Empty plain answers are not stored.
pub fn is_persistable(message: &Message) -> bool {
    match message {
        Message::Human { .. } => true,
        Message::Ai(decision) if decision.is_plain() => !decision.content.trim().is_empty(),
        Message::Ai(decision) => {
            decision.tool_calls.iter().any(ToolCall::is_transfer) || decision.respond_call().is_none()
        }
        Message::Tool(result) => result.name != RESPOND_TOOL,
    }
}

/// The persistable subset of `messages`, in order
pub fn persistable(messages: &[Message]) -> Vec<Message> {
    messages
        .iter()
        .filter(|m| is_persistable(m))
        .cloned()
        .collect()
}
