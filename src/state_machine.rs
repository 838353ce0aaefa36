//! Turn state machine
//!
//! The agent / tools / extract graph as pure data and pure routing. The
//! runtime owns the I/O and asks this module where to go next.

mod extract;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use extract::{extract_response, standing_answer, Answer};
pub use state::{ConversationState, PendingTransfer, TurnNode, DEFAULT_ANSWER, TRANSFER_TAG};
pub use transition::{route_after_agent, route_after_tools, should_continue};
