//! Order backend transport

use super::record::OrderRecord;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderLookupError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Order backend unreachable: {0}")]
    Transport(String),
    #[error("Malformed order payload: {0}")]
    Malformed(String),
}

/// Source of raw order records
#[async_trait]
pub trait OrderBackend: Send + Sync {
    async fn fetch(&self, order_id: &str) -> Result<OrderRecord, OrderLookupError>;
}

/// HTTP order backend: `GET <base_url>/<order_id>` returning `{"order": {...}}`
pub struct HttpOrderBackend {
    client: Client,
    base_url: String,
}

impl HttpOrderBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, OrderLookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OrderLookupError::Transport(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn parse_body(order_id: &str, body: &str) -> Result<OrderRecord, OrderLookupError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| OrderLookupError::Malformed(format!("{e}")))?;

        let order = match value.get("order") {
            Some(Value::Object(map)) if !map.is_empty() => Value::Object(map.clone()),
            _ => {
                tracing::warn!(order_id, "No 'order' key in response");
                return Err(OrderLookupError::NotFound(order_id.to_string()));
            }
        };

        serde_json::from_value(order).map_err(|e| OrderLookupError::Malformed(format!("{e}")))
    }
}

#[async_trait]
impl OrderBackend for HttpOrderBackend {
    async fn fetch(&self, order_id: &str) -> Result<OrderRecord, OrderLookupError> {
        let url = format!("{}/{}", self.base_url, order_id);
        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                OrderLookupError::Transport(format!("Request timeout: {e}"))
            } else {
                OrderLookupError::Transport(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::info!(order_id, "Order not found (404)");
            return Err(OrderLookupError::NotFound(order_id.to_string()));
        }
        if !status.is_success() {
            tracing::error!(order_id, %status, "Order backend returned an error status");
            return Err(OrderLookupError::Transport(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OrderLookupError::Transport(format!("Failed to read response: {e}")))?;

        Self::parse_body(order_id, &body)
    }
}
