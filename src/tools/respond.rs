//! Respond tool - the model's only way to answer the user

use super::{Tool, ToolContext, ToolOutput};
use crate::message::{RespondInput, RESPOND_TOOL};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Final tool. The turn machine ends the turn on a respond call without
/// running it; `run` exists so the tool behaves like any other when invoked
/// through the registry.
pub struct RespondTool;

#[async_trait]
impl Tool for RespondTool {
    fn name(&self) -> &'static str {
        RESPOND_TOOL
    }

    fn description(&self) -> String {
        "FINAL TOOL - call this to send your response to the user. Use it for greetings, thanks or casual chat, and once other tools have given you enough information to answer. This is the only way to send a message to the user.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["message"],
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Very concise final response message to send to the user"
                },
                "product_ids_to_show": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Optional list of product IDs to display to the user"
                }
            }
        })
    }

    async fn run(&self, input: Value, _ctx: ToolContext) -> ToolOutput {
        match serde_json::from_value::<RespondInput>(input) {
            Ok(input) => ToolOutput::success(input.message),
            Err(e) => ToolOutput::error(format!("Invalid input: {e}")),
        }
    }
}
