//! Model decision service abstraction
//!
//! The agent node asks a model for exactly one decision per round. Providers
//! sit behind `LlmService`; `LoggingService` wraps any of them.

mod error;
mod openai;
mod types;

pub use error::LlmError;
pub use openai::{OpenAIService, DEFAULT_BASE_URL};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for decision providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Ask for one decision over the given history
    async fn decide(&self, request: &DecisionRequest) -> Result<DecisionResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for decision services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn decide(&self, request: &DecisionRequest) -> Result<DecisionResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.decide(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                let calls: Vec<&str> = response
                    .decision
                    .tool_calls
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect();
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    tool_calls = ?calls,
                    "Decision received"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e,
                    "Decision request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
