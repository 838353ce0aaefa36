//! Mock implementations for testing
//!
//! These mocks enable turn-level testing without a model, an order backend
//! or a catalog.

use super::traits::*;
use crate::llm::{DecisionRequest, LlmError};
use crate::message::AiDecision;
use crate::orders::{OrderBackend, OrderLookupError, OrderRecord};
use crate::tools::{CatalogError, CatalogService, SearchQuery, ToolRegistry};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

// ============================================================================
// Scripted Decision Service
// ============================================================================

/// Decision service that returns queued decisions in order
#[derive(Default)]
pub struct ScriptedDecisionService {
    decisions: Mutex<VecDeque<Result<AiDecision, LlmError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<DecisionRequest>>,
}

impl ScriptedDecisionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a decision
    pub fn queue(&self, decision: AiDecision) {
        self.decisions.lock().unwrap().push_back(Ok(decision));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.decisions.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<DecisionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DecisionService for ScriptedDecisionService {
    async fn decide(&self, request: &DecisionRequest) -> Result<AiDecision, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.decisions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Transport("No scripted decision queued".to_string())))
    }
}

// ============================================================================
// Fake Order Backend
// ============================================================================

/// Order backend serving records from memory
#[derive(Default)]
pub struct FakeOrderBackend {
    orders: HashMap<String, Value>,
    failing: HashSet<String>,
    /// Order ids looked up, in order
    pub lookups: Mutex<Vec<String>>,
}

impl FakeOrderBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `record` (the backend's `order` object) for `order_id`
    pub fn with_order(mut self, order_id: impl Into<String>, record: Value) -> Self {
        self.orders.insert(order_id.into(), record);
        self
    }

    /// Fail lookups of `order_id` with a transport error
    pub fn with_transport_failure(mut self, order_id: impl Into<String>) -> Self {
        self.failing.insert(order_id.into());
        self
    }
}

#[async_trait]
impl OrderBackend for FakeOrderBackend {
    async fn fetch(&self, order_id: &str) -> Result<OrderRecord, OrderLookupError> {
        self.lookups.lock().unwrap().push(order_id.to_string());
        if self.failing.contains(order_id) {
            return Err(OrderLookupError::Transport("connection refused".to_string()));
        }
        let record = self
            .orders
            .get(order_id)
            .ok_or_else(|| OrderLookupError::NotFound(order_id.to_string()))?;
        serde_json::from_value(record.clone()).map_err(|e| OrderLookupError::Malformed(e.to_string()))
    }
}

// ============================================================================
// Fake Catalog
// ============================================================================

/// Catalog over an in-memory product list
#[derive(Default)]
pub struct FakeCatalog {
    products: Vec<Value>,
    fail: bool,
    searches: Mutex<Vec<String>>,
}

impl FakeCatalog {
    /// A catalog whose every call fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_product(mut self, product: Value) -> Self {
        self.products.push(product);
        self
    }

    /// Search queries received, in order
    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), CatalogError> {
        if self.fail {
            Err(CatalogError::Transport("catalog unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CatalogService for FakeCatalog {
    async fn search_products(&self, query: &SearchQuery) -> Result<Vec<Value>, CatalogError> {
        self.searches.lock().unwrap().push(query.query.clone());
        self.check()?;
        Ok(self.products.clone())
    }

    async fn product_details(&self, ids: &[i64]) -> Result<Vec<Value>, CatalogError> {
        self.check()?;
        let wanted: HashSet<String> = ids.iter().map(ToString::to_string).collect();
        Ok(self
            .products
            .iter()
            .filter(|p| p["id"].as_str().is_some_and(|id| wanted.contains(id)))
            .cloned()
            .collect())
    }

    async fn store_policy(&self, _query: &str) -> Result<Vec<Value>, CatalogError> {
        self.check()?;
        Ok(vec![serde_json::json!({"text": "Returns accepted within 14 days."})])
    }
}

/// Registry over fake collaborators
pub fn registry(orders: FakeOrderBackend) -> ToolRegistry {
    ToolRegistry::new(Arc::new(orders), Arc::new(FakeCatalog::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_scripted_service_exhausts_to_error() {
        let service = ScriptedDecisionService::new();
        service.queue(AiDecision::text("one"));
        let request = DecisionRequest::new("", vec![], vec![]);

        assert_eq!(service.decide(&request).await.unwrap(), AiDecision::text("one"));
        assert!(service.decide(&request).await.is_err());
        assert_eq!(service.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_fake_backend_records_lookups() {
        let backend = FakeOrderBackend::new().with_order("1", json!({"city": "თბილისი"}));
        assert!(backend.fetch("1").await.is_ok());
        assert!(matches!(
            backend.fetch("2").await,
            Err(OrderLookupError::NotFound(_))
        ));
        assert_eq!(*backend.lookups.lock().unwrap(), vec!["1", "2"]);
    }
}
