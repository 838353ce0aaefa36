//! Trait abstractions for runtime I/O
//!
//! These traits let the turn machine run against mock collaborators.

use crate::llm::{DecisionRequest, LlmError, LlmService};
use crate::message::AiDecision;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of model decisions
#[async_trait]
pub trait DecisionService: Send + Sync {
    /// Ask for exactly one decision over the sanitized history
    async fn decide(&self, request: &DecisionRequest) -> Result<AiDecision, LlmError>;
}

#[async_trait]
impl<T: DecisionService + ?Sized> DecisionService for Arc<T> {
    async fn decide(&self, request: &DecisionRequest) -> Result<AiDecision, LlmError> {
        (**self).decide(request).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter to use an `LlmService` as the decision source
pub struct LlmDecisionService {
    llm: Arc<dyn LlmService>,
}

impl LlmDecisionService {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl DecisionService for LlmDecisionService {
    async fn decide(&self, request: &DecisionRequest) -> Result<AiDecision, LlmError> {
        self.llm.decide(request).await.map(|response| response.decision)
    }
}
