//! Catalog-backed tools: product search, product details and store policy

use super::catalog::{CatalogService, SearchQuery};
use super::{Tool, ToolContext, ToolOutput};
use crate::message::{DETAILS_TOOL, POLICY_TOOL, SEARCH_TOOL};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

fn render(items: &[Value]) -> ToolOutput {
    match serde_json::to_string(items) {
        Ok(text) => ToolOutput::success(text),
        Err(e) => ToolOutput::error(format!("Failed to encode results: {e}")),
    }
}

pub struct SearchProductsTool {
    catalog: Arc<dyn CatalogService>,
}

impl SearchProductsTool {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Tool for SearchProductsTool {
    fn name(&self) -> &'static str {
        SEARCH_TOOL
    }

    fn description(&self) -> String {
        "Search the product catalog. Write the query in Georgian. Use filters only when the user states a price limit; set need_location when the user asks where a product is in stock.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query describing the product"
                },
                "filters": {
                    "type": "object",
                    "properties": {
                        "price_range": {
                            "type": "object",
                            "properties": {
                                "min_price": { "type": "number" },
                                "max_price": { "type": "number" }
                            }
                        }
                    }
                },
                "need_location": {
                    "type": "boolean",
                    "description": "Include branch stock information"
                }
            }
        })
    }

    async fn run(&self, input: Value, _ctx: ToolContext) -> ToolOutput {
        let query: SearchQuery = match serde_json::from_value(input) {
            Ok(q) => q,
            Err(e) => return ToolOutput::error(format!("Invalid input: {e}")),
        };

        match self.catalog.search_products(&query).await {
            Ok(items) => {
                tracing::debug!(query = %query.query, hits = items.len(), "Product search");
                render(&items)
            }
            Err(e) => ToolOutput::error(format!("Search failed: {e}")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetailsInput {
    #[serde(alias = "productIds", alias = "product_id")]
    product_ids: Vec<String>,
}

pub struct ProductDetailsTool {
    catalog: Arc<dyn CatalogService>,
}

impl ProductDetailsTool {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Tool for ProductDetailsTool {
    fn name(&self) -> &'static str {
        DETAILS_TOOL
    }

    fn description(&self) -> String {
        "Get full details (description, specifications, stock) for products found by a previous search.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["product_ids"],
            "properties": {
                "product_ids": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Product IDs returned by search_products"
                }
            }
        })
    }

    async fn run(&self, input: Value, _ctx: ToolContext) -> ToolOutput {
        let input: DetailsInput = match serde_json::from_value(input) {
            Ok(i) => i,
            Err(e) => return ToolOutput::error(format!("Invalid input: {e}")),
        };

        let ids = match input
            .product_ids
            .iter()
            .map(|id| id.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(ids) => ids,
            Err(e) => return ToolOutput::error(format!("Invalid product id: {e}")),
        };

        match self.catalog.product_details(&ids).await {
            Ok(items) => render(&items),
            Err(e) => ToolOutput::error(format!("Details lookup failed: {e}")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PolicyInput {
    query: String,
}

pub struct StorePolicyTool {
    catalog: Arc<dyn CatalogService>,
}

impl StorePolicyTool {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Tool for StorePolicyTool {
    fn name(&self) -> &'static str {
        POLICY_TOOL
    }

    fn description(&self) -> String {
        "Look up store policy: delivery, returns, warranty, payment options and branch information.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What the user wants to know about store policy"
                }
            }
        })
    }

    async fn run(&self, input: Value, _ctx: ToolContext) -> ToolOutput {
        let input: PolicyInput = match serde_json::from_value(input) {
            Ok(i) => i,
            Err(e) => return ToolOutput::error(format!("Invalid input: {e}")),
        };

        match self.catalog.store_policy(&input.query).await {
            Ok(items) => render(&items),
            Err(e) => ToolOutput::error(format!("Policy lookup failed: {e}")),
        }
    }
}
