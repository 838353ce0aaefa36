//! Conversation message types
//!
//! A closed sum type: every consumer matches exhaustively instead of
//! probing for attributes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Terminal tool: the model's final answer to the user.
pub const RESPOND_TOOL: &str = "respond_to_user";
/// Terminal tool: hand the conversation to a human operator.
pub const TRANSFER_TOOL: &str = "transfer_to_operator";
pub const ORDER_STATUS_TOOL: &str = "check_order_status";
pub const SEARCH_TOOL: &str = "search_products";
pub const DETAILS_TOOL: &str = "get_product_details";
pub const POLICY_TOOL: &str = "get_store_policy";

/// A single message in the conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Human {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        images: Vec<String>,
    },
    Ai(AiDecision),
    Tool(ToolResult),
}

impl Message {
    pub fn human(text: impl Into<String>) -> Self {
        Message::Human {
            text: text.into(),
            images: Vec::new(),
        }
    }

    pub fn human_with_images(text: impl Into<String>, images: Vec<String>) -> Self {
        Message::Human {
            text: text.into(),
            images,
        }
    }

    /// Plain assistant text
    pub fn ai_text(text: impl Into<String>) -> Self {
        Message::Ai(AiDecision::text(text))
    }

    pub fn ai_calls(tool_calls: Vec<ToolCall>) -> Self {
        Message::Ai(AiDecision::calls(tool_calls))
    }

    pub fn tool(
        name: impl Into<String>,
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Message::Tool(ToolResult {
            name: name.into(),
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        })
    }

    pub fn as_decision(&self) -> Option<&AiDecision> {
        match self {
            Message::Ai(decision) => Some(decision),
            _ => None,
        }
    }

    pub fn as_tool_result(&self) -> Option<&ToolResult> {
        match self {
            Message::Tool(result) => Some(result),
            _ => None,
        }
    }

    /// True for a tool result produced by the named tool
    pub fn is_tool_result_of(&self, name: &str) -> bool {
        self.as_tool_result().is_some_and(|r| r.name == name)
    }
}

/// A model turn: plain text, tool invocations, or both
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiDecision {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl AiDecision {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: String::new(),
            tool_calls,
        }
    }

    /// No tool invocations
    pub fn is_plain(&self) -> bool {
        self.tool_calls.is_empty()
    }

    pub fn has_call(&self, name: &str) -> bool {
        self.tool_calls.iter().any(|c| c.name == name)
    }

    /// Last respond call, if the decision carries one
    pub fn respond_call(&self) -> Option<&ToolCall> {
        self.tool_calls.iter().rev().find(|c| c.is_respond())
    }
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args,
        }
    }

    pub fn is_respond(&self) -> bool {
        self.name == RESPOND_TOOL
    }

    pub fn is_transfer(&self) -> bool {
        self.name == TRANSFER_TOOL
    }

    /// Parse the arguments of a respond call. Malformed arguments read as an
    /// empty message so extraction never fails.
    pub fn respond_input(&self) -> RespondInput {
        serde_json::from_value(self.args.clone()).unwrap_or_default()
    }
}

/// Output of an executed (or synthesized) tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub name: String,
    pub tool_call_id: String,
    pub content: String,
}

/// Arguments of the respond tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondInput {
    #[serde(default)]
    pub message: String,
    #[serde(
        default,
        alias = "productIds",
        alias = "product_ids",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_ids_to_show: Option<Vec<String>>,
}

/// Arguments of the transfer tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInput {
    pub reason: String,
}

/// Arguments of the order-status tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusInput {
    #[serde(alias = "orderId")]
    pub order_id: String,
}
