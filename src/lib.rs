//! Order desk - a bounded tool-calling assistant for a retail shop
//!
//! One user message runs through an agent / tools / extract turn graph: the
//! model picks tools, the order-status classifier can short-circuit the turn
//! to an operator, and the history is sanitized before every model call.

pub mod config;
pub mod history;
pub mod llm;
pub mod message;
pub mod orders;
pub mod runtime;
pub mod state_machine;
pub mod system_prompt;
pub mod tools;
