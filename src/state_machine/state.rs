//! Turn state types

use crate::message::Message;
use serde::{Deserialize, Serialize};

/// Tag reported to the caller when the turn ended in an operator handoff
pub const TRANSFER_TAG: &str = "transfer_to_operator";

/// Answer used when nothing better can be extracted
pub const DEFAULT_ANSWER: &str = "რით შემიძლია დაგეხმაროთ? ☺️";

/// Nodes of the turn graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnNode {
    /// Ask the model for one decision
    Agent,
    /// Execute the latest decision's tool calls
    Tools,
    /// Resolve the answer (terminal)
    ExtractResponse,
}

/// Operator handoff decided by the order-status classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransfer {
    pub message: String,
}

/// Mutable state of one turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Append-only within a turn
    pub messages: Vec<Message>,
    pub product_ids_to_show: Option<Vec<String>>,
    /// Set at most once per turn
    pub pending_transfer: Option<PendingTransfer>,
    pub tool_call_tag: Option<String>,
}

impl ConversationState {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Record a handoff. The first one wins; returns whether it was recorded.
    pub fn set_pending_transfer(&mut self, message: impl Into<String>) -> bool {
        if self.pending_transfer.is_some() {
            return false;
        }
        self.pending_transfer = Some(PendingTransfer {
            message: message.into(),
        });
        true
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
