//! Property-based tests for turn routing and extraction

use super::*;
use crate::message::{
    AiDecision, Message, ToolCall, DETAILS_TOOL, ORDER_STATUS_TOOL, POLICY_TOOL, RESPOND_TOOL,
    SEARCH_TOOL, TRANSFER_TOOL,
};
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_tool_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(SEARCH_TOOL),
        Just(DETAILS_TOOL),
        Just(POLICY_TOOL),
        Just(ORDER_STATUS_TOOL),
        Just(TRANSFER_TOOL),
        Just(RESPOND_TOOL),
    ]
}

fn arb_tool_call() -> impl Strategy<Value = ToolCall> {
    ("[a-z]{8}", arb_tool_name(), "[a-zA-Z ]{0,20}").prop_map(|(id, name, text)| {
        ToolCall::new(id, name, json!({ "message": text, "query": text }))
    })
}

fn arb_decision() -> impl Strategy<Value = AiDecision> {
    prop_oneof![
        "[a-zA-Z ]{0,30}".prop_map(AiDecision::text),
        prop::collection::vec(arb_tool_call(), 1..4).prop_map(AiDecision::calls),
    ]
}

fn arb_message() -> impl Strategy<Value = Message> {
    prop_oneof![
        "[a-zA-Z ?]{1,30}".prop_map(Message::human),
        arb_decision().prop_map(Message::Ai),
        ("[a-z]{8}", arb_tool_name(), "[a-zA-Z0-9 ]{0,30}")
            .prop_map(|(id, name, content)| Message::tool(name, id, content)),
    ]
}

fn arb_state() -> impl Strategy<Value = ConversationState> {
    (
        prop::collection::vec(arb_message(), 0..12),
        prop::option::of("[a-zA-Z ]{1,20}"),
    )
        .prop_map(|(messages, transfer)| {
            let mut state = ConversationState::new(messages);
            if let Some(message) = transfer {
                state.set_pending_transfer(message);
            }
            state
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// A respond call always ends the turn, whatever else the decision holds
    #[test]
    fn prop_respond_always_extracts(
        mut calls in prop::collection::vec(arb_tool_call(), 0..4),
        position in 0usize..4,
    ) {
        let respond = ToolCall::new("r", RESPOND_TOOL, json!({"message": "ok"}));
        let at = position.min(calls.len());
        calls.insert(at, respond);
        prop_assert_eq!(route_after_agent(&AiDecision::calls(calls)), TurnNode::ExtractResponse);
    }

    /// Decisions without terminal routing always need tools
    #[test]
    fn prop_non_respond_calls_route_to_tools(calls in prop::collection::vec(arb_tool_call(), 1..4)) {
        let decision = AiDecision::calls(calls);
        let expected = if decision.respond_call().is_some() {
            TurnNode::ExtractResponse
        } else {
            TurnNode::Tools
        };
        prop_assert_eq!(route_after_agent(&decision), expected);
    }

    /// Extraction appends exactly one plain assistant message
    #[test]
    fn prop_extract_appends_one_plain_message(mut state in arb_state()) {
        let before = state.messages.len();
        let answer = extract_response(&mut state);
        prop_assert_eq!(state.messages.len(), before + 1);
        prop_assert_eq!(state.last(), Some(&Message::ai_text(answer.text)));
    }

    /// After extraction the controller never starts another pass
    #[test]
    fn prop_extracted_state_terminates(mut state in arb_state()) {
        extract_response(&mut state);
        prop_assert!(!should_continue(&state.messages));
    }

    /// A pending handoff dominates every other answer source
    #[test]
    fn prop_pending_transfer_wins(messages in prop::collection::vec(arb_message(), 0..12), text in "[a-zA-Z ]{1,20}") {
        let mut state = ConversationState::new(messages);
        state.set_pending_transfer(text.clone());
        let answer = extract_response(&mut state);
        prop_assert_eq!(answer.text, text);
        prop_assert_eq!(answer.tool_tag.as_deref(), Some(TRANSFER_TAG));
        prop_assert_eq!(answer.product_ids, None);
    }

    /// Only transfer outcomes carry a tag, and it is always the transfer tag
    #[test]
    fn prop_tag_is_transfer_or_none(mut state in arb_state()) {
        let answer = extract_response(&mut state);
        if let Some(tag) = answer.tool_tag {
            prop_assert_eq!(tag, TRANSFER_TAG);
        } else {
            prop_assert!(state.pending_transfer.is_none());
        }
    }

    /// A pending handoff after tools always ends the turn
    #[test]
    fn prop_tools_with_pending_transfer_extract(mut state in arb_state(), text in "[a-z]{1,10}") {
        state.set_pending_transfer(text);
        let start = state.messages.len();
        prop_assert_eq!(route_after_tools(&state, start), TurnNode::ExtractResponse);
    }
}
