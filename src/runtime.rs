//! Runtime for executing turns
//!
//! `TurnMachine` performs the I/O for each node of the turn graph,
//! `IterationController` bounds and commits passes, and `TurnProcessor`
//! is the entry point the driver calls once per user message.

mod controller;
mod machine;
pub mod traits;
mod turn;

#[cfg(test)]
pub mod testing;

pub use controller::{IterationController, RunOutcome, DEFAULT_MAX_ITERATIONS};
pub use machine::{PassOutcome, TurnMachine, DEFAULT_MAX_ROUNDS_PER_PASS};
pub use traits::*;
pub use turn::{TurnProcessor, TurnResponse};

use crate::history::HistoryError;
use crate::llm::LlmError;
use thiserror::Error;

/// Fatal turn errors; everything else resolves to an answer
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Model service failed: {0}")]
    Model(#[from] LlmError),
    #[error("History store failed: {0}")]
    History(#[from] HistoryError),
}

/// Production processor type
pub type ProductionProcessor = TurnProcessor<LlmDecisionService>;
