//! History sanitizer
//!
//! The model must never see its own respond call re-presented as a pending
//! tool call; transfer calls stay visible so later turns know a handoff
//! happened.

use crate::message::{AiDecision, Message, RESPOND_TOOL};

/// Reshape a message sequence for the next model call.
///
/// Order-preserving and side-effect free. Applying it twice gives the same
/// result as applying it once.
pub fn sanitize(messages: &[Message]) -> Vec<Message> {
    let mut sanitized = Vec::with_capacity(messages.len());
    let mut skip_next_tool_result = false;

    for message in messages {
        match message {
            Message::Ai(decision) if decision.is_plain() => sanitized.push(message.clone()),
            Message::Ai(decision) => {
                let respond = decision.respond_call();
                let kept: Vec<_> = decision
                    .tool_calls
                    .iter()
                    .filter(|c| !c.is_respond())
                    .cloned()
                    .collect();

                if kept.is_empty() {
                    // Only respond was called: keep its text as a plain turn
                    let text = respond.map(|c| c.respond_input().message).unwrap_or_default();
                    if !text.is_empty() {
                        sanitized.push(Message::ai_text(text));
                    }
                    skip_next_tool_result = true;
                } else {
                    sanitized.push(Message::Ai(AiDecision {
                        content: decision.content.clone(),
                        tool_calls: kept,
                    }));
                    if respond.is_some() {
                        skip_next_tool_result = true;
                    }
                }
            }
            Message::Tool(result) => {
                if result.name == RESPOND_TOOL || skip_next_tool_result {
                    skip_next_tool_result = false;
                    continue;
                }
                sanitized.push(message.clone());
            }
            Message::Human { .. } => sanitized.push(message.clone()),
        }
    }

    sanitized
}
