//! Property-based tests for sanitization and the commit filter

use super::*;
use crate::message::{
    AiDecision, Message, ToolCall, DETAILS_TOOL, ORDER_STATUS_TOOL, RESPOND_TOOL, SEARCH_TOOL,
    TRANSFER_TOOL,
};
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Non-blank text; blank plain answers are never committed, so they are
/// excluded where a property composes sanitize with the commit filter.
fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z ]{0,20}"
}

/// User text, including empty and whitespace-only input
fn arb_human_text() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => arb_text(),
        1 => "[ \t\n]{0,4}",
    ]
}

fn arb_tool_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(SEARCH_TOOL),
        Just(DETAILS_TOOL),
        Just(ORDER_STATUS_TOOL),
        Just(TRANSFER_TOOL),
        Just(RESPOND_TOOL),
    ]
}

fn arb_tool_call() -> impl Strategy<Value = ToolCall> {
    ("[a-z]{6}", arb_tool_name(), arb_text())
        .prop_map(|(id, name, text)| ToolCall::new(id, name, json!({ "message": text })))
}

fn arb_decision() -> impl Strategy<Value = AiDecision> {
    prop_oneof![
        arb_text().prop_map(AiDecision::text),
        prop::collection::vec(arb_tool_call(), 1..4).prop_map(AiDecision::calls),
        (arb_text(), prop::collection::vec(arb_tool_call(), 1..3)).prop_map(|(content, tool_calls)| {
            AiDecision {
                content,
                tool_calls,
            }
        }),
    ]
}

fn arb_message() -> impl Strategy<Value = Message> {
    prop_oneof![
        arb_human_text().prop_map(Message::human),
        arb_decision().prop_map(Message::Ai),
        ("[a-z]{6}", arb_tool_name(), "[a-zA-Z0-9 ]{0,20}")
            .prop_map(|(id, name, content)| Message::tool(name, id, content)),
    ]
}

/// A decision followed by one result per call, the shape the turn machine
/// produces.
fn arb_exchange() -> impl Strategy<Value = Vec<Message>> {
    (arb_human_text(), prop::collection::vec(arb_tool_call(), 1..4)).prop_map(|(question, calls)| {
        let mut messages = vec![Message::human(question)];
        let results: Vec<Message> = calls
            .iter()
            .map(|c| Message::tool(c.name.clone(), c.id.clone(), "result"))
            .collect();
        messages.push(Message::ai_calls(calls));
        messages.extend(results);
        messages
    })
}

fn arb_history() -> impl Strategy<Value = Vec<Message>> {
    prop_oneof![
        prop::collection::vec(arb_message(), 0..20),
        prop::collection::vec(arb_exchange(), 0..5)
            .prop_map(|chunks| chunks.into_iter().flatten().collect()),
    ]
}

fn respond_calls(messages: &[Message]) -> usize {
    messages
        .iter()
        .filter_map(Message::as_decision)
        .flat_map(|d| d.tool_calls.iter())
        .filter(|c| c.is_respond())
        .count()
}

fn transfer_calls(messages: &[Message]) -> usize {
    messages
        .iter()
        .filter_map(Message::as_decision)
        .flat_map(|d| d.tool_calls.iter())
        .filter(|c| c.is_transfer())
        .count()
}

fn humans(messages: &[Message]) -> Vec<&Message> {
    messages
        .iter()
        .filter(|m| matches!(m, Message::Human { .. }))
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_sanitize_is_idempotent(messages in arb_history()) {
        let once = sanitize(&messages);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn prop_no_respond_survives(messages in arb_history()) {
        let sanitized = sanitize(&messages);
        prop_assert_eq!(respond_calls(&sanitized), 0);
        prop_assert!(!sanitized.iter().any(|m| m.is_tool_result_of(RESPOND_TOOL)));
    }

    #[test]
    fn prop_transfer_calls_stay_visible(messages in arb_history()) {
        prop_assert_eq!(transfer_calls(&sanitize(&messages)), transfer_calls(&messages));
    }

    #[test]
    fn prop_human_messages_preserved_in_order(messages in arb_history()) {
        let sanitized = sanitize(&messages);
        prop_assert_eq!(humans(&sanitized), humans(&messages));
    }

    #[test]
    fn prop_persist_round_trip(messages in arb_history()) {
        let once = sanitize(&messages);
        prop_assert_eq!(sanitize(&persistable(&once)), once);
    }

    /// A respond-only decision's result never reaches the model
    #[test]
    fn prop_respond_only_result_suppressed(
        before in prop::collection::vec(arb_message(), 0..6),
        text in arb_text(),
    ) {
        let mut messages = before;
        messages.push(Message::ai_calls(vec![ToolCall::new("r1", RESPOND_TOOL, json!({ "message": text.clone() }))]));
        messages.push(Message::tool(RESPOND_TOOL, "r1", text.clone()));

        let sanitized = sanitize(&messages);
        prop_assert_eq!(sanitized.last(), Some(&Message::ai_text(text)));
    }

    #[test]
    fn prop_commit_keeps_every_human_message(messages in arb_history()) {
        let stored = persistable(&messages);
        prop_assert_eq!(humans(&stored), humans(&messages));
    }

    #[test]
    fn prop_blank_plain_answers_not_committed(
        messages in arb_history(),
        blank in "[ \t\n]{0,4}",
    ) {
        let mut produced = messages.clone();
        produced.push(Message::ai_text(blank));
        prop_assert_eq!(persistable(&produced), persistable(&messages));
    }

    #[test]
    fn prop_commit_never_stores_respond_only_calls(messages in arb_history()) {
        for stored in persistable(&messages) {
            if let Some(decision) = stored.as_decision() {
                prop_assert!(!decision.has_call(RESPOND_TOOL) || decision.has_call(TRANSFER_TOOL));
            }
            prop_assert!(!stored.is_tool_result_of(RESPOND_TOOL));
        }
    }
}
