//! Catalog search service
//!
//! Retrieval (dense/sparse search, embeddings) lives behind this trait; the
//! agent only sees payload lists.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Maximum products returned by a search
pub const SEARCH_LIMIT: usize = 20;
/// Maximum policy passages returned by a lookup
pub const POLICY_LIMIT: usize = 7;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Transport(String),
    #[error("Catalog returned an unexpected payload: {0}")]
    Payload(String),
    #[error("Catalog service is not configured")]
    Unconfigured,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
}

impl SearchFilters {
    /// Vector-store filter clause, or `None` when nothing constrains the search
    pub fn to_filter(&self) -> Option<Value> {
        let range = self.price_range.as_ref()?;
        let mut bounds = serde_json::Map::new();
        if let Some(min) = range.min_price {
            bounds.insert("gte".to_string(), json!(min));
        }
        if let Some(max) = range.max_price {
            bounds.insert("lte".to_string(), json!(max));
        }
        if bounds.is_empty() {
            return None;
        }
        Some(json!({ "must": [{ "key": "metadata.price", "range": bounds }] }))
    }
}

/// Arguments of the product search tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default)]
    pub filters: Option<SearchFilters>,
    #[serde(default)]
    pub need_location: bool,
}

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn search_products(&self, query: &SearchQuery) -> Result<Vec<Value>, CatalogError>;

    async fn product_details(&self, ids: &[i64]) -> Result<Vec<Value>, CatalogError>;

    async fn store_policy(&self, query: &str) -> Result<Vec<Value>, CatalogError>;
}

/// Catalog reached over HTTP: each endpoint takes a JSON body and returns a
/// JSON array of payloads.
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Transport(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post(&self, endpoint: &str, body: Value) -> Result<Vec<Value>, CatalogError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Transport(format!("HTTP {status} from {endpoint}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| CatalogError::Payload(e.to_string()))?;
        match payload {
            Value::Array(items) => Ok(items),
            Value::Object(mut map) => match map.remove("results") {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(CatalogError::Payload("expected a results array".to_string())),
            },
            other => Err(CatalogError::Payload(format!("unexpected {other}"))),
        }
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn search_products(&self, query: &SearchQuery) -> Result<Vec<Value>, CatalogError> {
        let filter = query.filters.as_ref().and_then(SearchFilters::to_filter);
        self.post(
            "search",
            json!({
                "query": query.query,
                "k": SEARCH_LIMIT,
                "filter": filter,
                "need_location": query.need_location,
            }),
        )
        .await
    }

    async fn product_details(&self, ids: &[i64]) -> Result<Vec<Value>, CatalogError> {
        self.post("details", json!({ "ids": ids })).await
    }

    async fn store_policy(&self, query: &str) -> Result<Vec<Value>, CatalogError> {
        self.post("policy", json!({ "query": query, "k": POLICY_LIMIT }))
            .await
    }
}

/// Stand-in when no catalog endpoint is configured; every call fails, which
/// the tools report to the model as an error result.
pub struct UnconfiguredCatalog;

#[async_trait]
impl CatalogService for UnconfiguredCatalog {
    async fn search_products(&self, _query: &SearchQuery) -> Result<Vec<Value>, CatalogError> {
        Err(CatalogError::Unconfigured)
    }

    async fn product_details(&self, _ids: &[i64]) -> Result<Vec<Value>, CatalogError> {
        Err(CatalogError::Unconfigured)
    }

    async fn store_policy(&self, _query: &str) -> Result<Vec<Value>, CatalogError> {
        Err(CatalogError::Unconfigured)
    }
}
