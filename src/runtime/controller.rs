//! Iteration controller
//!
//! Re-enters the turn machine until a terminal condition holds or the
//! iteration bound is spent, committing each pass's new messages through the
//! persistence filter.

use super::machine::{PassOutcome, TurnMachine};
use super::traits::DecisionService;
use super::AgentError;
use crate::history::{persistable, HistorySink};
use crate::message::Message;
use crate::state_machine::{
    extract_response, should_continue, standing_answer, Answer, ConversationState,
};

/// Default bound on machine passes per turn
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Final state of a controlled run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub state: ConversationState,
    pub answer: Answer,
    pub passes: usize,
    /// The bound was spent before a terminal condition; `answer` is best-effort
    pub exhausted: bool,
}

pub struct IterationController<'a, D: DecisionService> {
    machine: &'a TurnMachine<D>,
}

impl<'a, D: DecisionService> IterationController<'a, D> {
    pub fn new(machine: &'a TurnMachine<D>) -> Self {
        Self { machine }
    }

    /// Drive the machine over `initial`, which is assumed to be committed
    /// already. Only messages produced here are appended to `sink`.
    pub async fn run(
        &self,
        session_id: &str,
        initial: Vec<Message>,
        sink: &dyn HistorySink,
        max_iterations: usize,
    ) -> Result<RunOutcome, AgentError> {
        let mut state = ConversationState::new(initial);
        let mut committed = state.messages.len();
        let mut passes = 0;

        while passes < max_iterations && should_continue(&state.messages) {
            passes += 1;
            let outcome = self.machine.run_pass(session_id, &mut state).await?;
            committed = commit(sink, &state, committed).await?;

            if let PassOutcome::Completed(answer) = outcome {
                tracing::info!(session_id, passes, "Turn completed");
                return Ok(RunOutcome {
                    state,
                    answer,
                    passes,
                    exhausted: false,
                });
            }
        }

        let exhausted = should_continue(&state.messages);
        if passes == 0 && !exhausted {
            // Already settled: report the standing reply, write nothing
            tracing::debug!(session_id, "History needs no pass");
            let answer = standing_answer(&state);
            return Ok(RunOutcome {
                state,
                answer,
                passes,
                exhausted,
            });
        }
        if exhausted {
            tracing::warn!(
                session_id,
                passes,
                max_iterations,
                "Iteration bound spent without a terminal decision, returning best-effort answer"
            );
        }

        let answer = extract_response(&mut state);
        commit(sink, &state, committed).await?;

        Ok(RunOutcome {
            state,
            answer,
            passes,
            exhausted,
        })
    }
}

/// Append the persistable part of `state.messages[from..]`; returns the new
/// committed count.
async fn commit(
    sink: &dyn HistorySink,
    state: &ConversationState,
    from: usize,
) -> Result<usize, AgentError> {
    let fresh = state.messages.get(from..).unwrap_or_default();
    let accepted = persistable(fresh);
    if !accepted.is_empty() {
        sink.append(&accepted).await?;
    }
    tracing::debug!(
        produced = fresh.len(),
        stored = accepted.len(),
        "Committed pass messages"
    );
    Ok(state.messages.len())
}
