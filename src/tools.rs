//! Tool implementations
//!
//! The tool set is fixed: product search, product details, store policy,
//! order status, operator transfer and the final respond tool. Tools are
//! stateless; per-call context arrives through `ToolContext`.

pub mod catalog;
mod order_status;
mod products;
mod respond;
mod transfer;

pub use catalog::{
    CatalogError, CatalogService, HttpCatalog, PriceRange, SearchFilters, SearchQuery,
    UnconfiguredCatalog,
};
pub use order_status::OrderStatusTool;
pub use products::{ProductDetailsTool, SearchProductsTool, StorePolicyTool};
pub use respond::RespondTool;
pub use transfer::{TransferTool, TRANSFER_RESULT};

use crate::llm::ToolDefinition;
use crate::orders::OrderBackend;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Result from tool execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub output: String,
}

impl ToolOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: message.into(),
        }
    }

    /// Content of the tool result message shown to the model
    pub fn into_content(self) -> String {
        if self.success {
            self.output
        } else {
            format!("Error: {}\n Please fix your mistakes.", self.output)
        }
    }
}

/// Per-invocation context
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub session_id: String,
    pub tool_call_id: String,
}

impl ToolContext {
    pub fn new(session_id: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            tool_call_id: tool_call_id.into(),
        }
    }
}

/// A tool the model can call
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// Tool description for the model
    fn description(&self) -> String;

    /// JSON schema for tool input
    fn input_schema(&self) -> Value;

    async fn run(&self, input: Value, ctx: ToolContext) -> ToolOutput;
}

/// The fixed set of tools available to a turn
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    order_status: Arc<OrderStatusTool>,
}

impl ToolRegistry {
    pub fn new(orders: Arc<dyn OrderBackend>, catalog: Arc<dyn CatalogService>) -> Self {
        let order_status = Arc::new(OrderStatusTool::new(orders));
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(SearchProductsTool::new(catalog.clone())),
            Arc::new(ProductDetailsTool::new(catalog.clone())),
            Arc::new(RespondTool),
            Arc::new(StorePolicyTool::new(catalog)),
            Arc::new(TransferTool),
            order_status.clone(),
        ];
        Self {
            tools,
            order_status,
        }
    }

    /// The order-status tool, which the turn machine drives directly
    pub fn order_status(&self) -> &OrderStatusTool {
        &self.order_status
    }

    /// Get all tool definitions for the model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    /// Execute a tool by name; `None` for unknown tools
    pub async fn execute(&self, name: &str, input: Value, ctx: ToolContext) -> Option<ToolOutput> {
        for tool in &self.tools {
            if tool.name() == name {
                return Some(tool.run(input, ctx).await);
            }
        }
        None
    }
}
