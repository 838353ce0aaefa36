//! Transfer tool - hands the conversation to a human operator

use super::{Tool, ToolContext, ToolOutput};
use crate::message::{TransferInput, TRANSFER_TOOL};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Stored as the transfer result so later turns know the operator already
/// talked to the user.
pub const TRANSFER_RESULT: &str =
    "User has finished speaking with human operator. Now you can continue the conversation.";

pub struct TransferTool;

#[async_trait]
impl Tool for TransferTool {
    fn name(&self) -> &'static str {
        TRANSFER_TOOL
    }

    fn description(&self) -> String {
        "Transfer the conversation to a human operator. This stops the AI loop immediately. Use it when the user asks for a human, when the issue is outside your capabilities, or when the user is frustrated.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["reason"],
            "properties": {
                "reason": {
                    "type": "string",
                    "description": "Why the conversation is being transferred to a human operator"
                }
            }
        })
    }

    async fn run(&self, input: Value, ctx: ToolContext) -> ToolOutput {
        match serde_json::from_value::<TransferInput>(input) {
            Ok(input) => {
                tracing::info!(session_id = %ctx.session_id, reason = %input.reason, "Transferring to operator");
                ToolOutput::success(TRANSFER_RESULT)
            }
            Err(e) => ToolOutput::error(format!("Invalid input: {e}")),
        }
    }
}
