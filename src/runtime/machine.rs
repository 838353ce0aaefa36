//! Turn machine: runs the agent / tools / extract graph for one pass

use super::traits::DecisionService;
use crate::history::sanitize;
use crate::llm::{DecisionRequest, LlmError};
use crate::message::{Message, ToolCall, ORDER_STATUS_TOOL};
use crate::orders::templates;
use crate::state_machine::{
    extract_response, route_after_agent, route_after_tools, Answer, ConversationState, TurnNode,
};
use crate::tools::{ToolContext, ToolOutput, ToolRegistry};
use std::sync::Arc;

/// Default bound on agent rounds within one pass
pub const DEFAULT_MAX_ROUNDS_PER_PASS: usize = 12;

/// How a pass ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// Reached the terminal node
    Completed(Answer),
    /// Hit the round bound after a tools node; re-enter at `Agent`
    Suspended,
}

/// Executes turn nodes against the model and the tool registry.
pub struct TurnMachine<D: DecisionService> {
    decisions: D,
    tools: Arc<ToolRegistry>,
    system_prompt: String,
    temperature: Option<f32>,
    max_rounds_per_pass: usize,
}

impl<D: DecisionService> TurnMachine<D> {
    pub fn new(decisions: D, tools: Arc<ToolRegistry>, system_prompt: impl Into<String>) -> Self {
        Self {
            decisions,
            tools,
            system_prompt: system_prompt.into(),
            temperature: None,
            max_rounds_per_pass: DEFAULT_MAX_ROUNDS_PER_PASS,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_rounds_per_pass(mut self, rounds: usize) -> Self {
        self.max_rounds_per_pass = rounds.max(1);
        self
    }

    /// Run from `Agent` until `ExtractResponse` or the round bound.
    ///
    /// Model errors are fatal for the turn and propagate; tool failures
    /// become error-content tool results.
    pub async fn run_pass(
        &self,
        session_id: &str,
        state: &mut ConversationState,
    ) -> Result<PassOutcome, LlmError> {
        let mut node = TurnNode::Agent;
        let mut rounds = 0;

        loop {
            node = match node {
                TurnNode::Agent => {
                    rounds += 1;
                    self.agent(state).await?
                }
                TurnNode::Tools => {
                    let next = self.execute_tools(session_id, state).await;
                    if next == TurnNode::Agent && rounds >= self.max_rounds_per_pass {
                        tracing::debug!(session_id, rounds, "Round bound reached, suspending pass");
                        return Ok(PassOutcome::Suspended);
                    }
                    next
                }
                TurnNode::ExtractResponse => {
                    let answer = extract_response(state);
                    tracing::info!(
                        session_id,
                        rounds,
                        tool_tag = answer.tool_tag.as_deref().unwrap_or(""),
                        "Turn answer extracted"
                    );
                    return Ok(PassOutcome::Completed(answer));
                }
            };
        }
    }

    async fn agent(&self, state: &mut ConversationState) -> Result<TurnNode, LlmError> {
        let mut request = DecisionRequest::new(
            self.system_prompt.clone(),
            sanitize(&state.messages),
            self.tools.definitions(),
        );
        request.temperature = self.temperature;

        let decision = self.decisions.decide(&request).await?;
        let next = route_after_agent(&decision);
        tracing::debug!(
            calls = decision.tool_calls.len(),
            next = ?next,
            "Agent decided"
        );
        state.push(Message::Ai(decision));
        Ok(next)
    }

    async fn execute_tools(&self, session_id: &str, state: &mut ConversationState) -> TurnNode {
        let calls: Vec<ToolCall> = state
            .last()
            .and_then(Message::as_decision)
            .map(|d| d.tool_calls.clone())
            .unwrap_or_default();
        let round_start = state.messages.len();

        for call in calls {
            let content = if call.name == ORDER_STATUS_TOOL {
                self.check_order(state, &call).await
            } else {
                self.run_tool(session_id, &call).await
            };
            state.push(Message::tool(call.name, call.id, content));
        }

        route_after_tools(state, round_start)
    }

    /// Order status bypasses the registry so a handoff can end the turn
    /// without another model round.
    async fn check_order(&self, state: &mut ConversationState, call: &ToolCall) -> String {
        let outcome = self.tools.order_status().check(call.args.clone()).await;
        if let Some(message) = outcome.transfer_message() {
            if !state.set_pending_transfer(message) {
                tracing::debug!("Handoff already pending, keeping the first");
            }
            return format!("{}{message}", templates::TRANSFER_PREFIX);
        }
        outcome.tool_content().unwrap_or_default()
    }

    async fn run_tool(&self, session_id: &str, call: &ToolCall) -> String {
        let ctx = ToolContext::new(session_id, call.id.clone());
        let output = match self.tools.execute(&call.name, call.args.clone(), ctx).await {
            Some(output) => output,
            None => {
                let known: Vec<String> = self.tools.definitions().into_iter().map(|d| d.name).collect();
                tracing::warn!(tool = %call.name, "Model called an unknown tool");
                ToolOutput::error(format!(
                    "{} is not a valid tool, try one of [{}].",
                    call.name,
                    known.join(", ")
                ))
            }
        };
        if !output.success {
            tracing::warn!(tool = %call.name, error = %output.output, "Tool failed");
        }
        output.into_content()
    }
}
