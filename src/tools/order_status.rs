//! Order status tool
//!
//! Looks the order up and classifies it in the same call. The turn machine
//! calls `check` directly so it can short-circuit on transfer outcomes;
//! `run` renders the same outcome as plain tool content.

use super::{Tool, ToolContext, ToolOutput};
use crate::message::{OrderStatusInput, ORDER_STATUS_TOOL};
use crate::orders::{classify_lookup, templates, OrderBackend, StatusOutcome};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct OrderStatusTool {
    backend: Arc<dyn OrderBackend>,
}

impl OrderStatusTool {
    pub fn new(backend: Arc<dyn OrderBackend>) -> Self {
        Self { backend }
    }

    /// Fetch and classify. Never fails: bad arguments and lookup errors
    /// resolve to `NotFound`.
    pub async fn check(&self, input: Value) -> StatusOutcome {
        let input = match serde_json::from_value::<OrderStatusInput>(input) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid order status arguments");
                return StatusOutcome::NotFound;
            }
        };

        let outcome = classify_lookup(self.backend.fetch(&input.order_id).await);
        tracing::info!(order_id = %input.order_id, outcome = outcome.label(), "Order status classified");
        outcome
    }
}

#[async_trait]
impl Tool for OrderStatusTool {
    fn name(&self) -> &'static str {
        ORDER_STATUS_TOOL
    }

    fn description(&self) -> String {
        "Check the status of an order given its order number. Use the EXACT order number as provided by the user; do not modify, duplicate, or alter it in any way.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["order_id"],
            "properties": {
                "order_id": {
                    "type": "string",
                    "description": "The order identifier, written verbatim as provided by the user"
                }
            }
        })
    }

    async fn run(&self, input: Value, _ctx: ToolContext) -> ToolOutput {
        let outcome = self.check(input).await;
        if let Some(message) = outcome.transfer_message() {
            return ToolOutput::success(format!("{}{message}", templates::TRANSFER_PREFIX));
        }
        ToolOutput::success(outcome.tool_content().unwrap_or_default())
    }
}
