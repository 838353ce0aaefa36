//! Common types for decision requests

use crate::message::{AiDecision, Message};
use serde::{Deserialize, Serialize};

/// Tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// A request for one model decision over the sanitized history. Whenever
/// tools are offered the model must call at least one of them.
#[derive(Debug, Clone)]
pub struct DecisionRequest {
    pub system: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub temperature: Option<f32>,
}

impl DecisionRequest {
    pub fn new(system: impl Into<String>, messages: Vec<Message>, tools: Vec<ToolDefinition>) -> Self {
        Self {
            system: system.into(),
            messages,
            tools,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// The model's decision plus accounting
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionResponse {
    pub decision: AiDecision,
    pub usage: Usage,
}
