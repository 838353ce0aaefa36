//! Turn entry point: one user message in, one answer out

use super::controller::{IterationController, DEFAULT_MAX_ITERATIONS};
use super::machine::TurnMachine;
use super::traits::DecisionService;
use super::AgentError;
use crate::history::{sanitize, HistorySink};
use crate::message::Message;
use serde::{Deserialize, Serialize};

/// What the calling layer receives for a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub answer_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_tag: Option<String>,
    /// The iteration bound was spent; the answer is best-effort
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exhausted: bool,
}

pub struct TurnProcessor<D: DecisionService> {
    machine: TurnMachine<D>,
    max_iterations: usize,
}

impl<D: DecisionService> TurnProcessor<D> {
    pub fn new(machine: TurnMachine<D>) -> Self {
        Self {
            machine,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Process one user message against a session's history.
    ///
    /// The user message is stored before the loop runs, so it survives a
    /// failed turn.
    pub async fn process_turn(
        &self,
        session_id: &str,
        history: &dyn HistorySink,
        user_message: Message,
    ) -> Result<TurnResponse, AgentError> {
        history.append(std::slice::from_ref(&user_message)).await?;
        let initial = sanitize(&history.load_all().await?);
        tracing::info!(session_id, history_len = initial.len(), "Processing turn");

        let outcome = IterationController::new(&self.machine)
            .run(session_id, initial, history, self.max_iterations)
            .await?;

        Ok(TurnResponse {
            answer_text: outcome.answer.text,
            product_ids: outcome.answer.product_ids,
            tool_tag: outcome.answer.tool_tag,
            exhausted: outcome.exhausted,
        })
    }
}
