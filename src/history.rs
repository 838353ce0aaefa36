//! Conversation history: what the model may see, and what gets stored
//!
//! - `sanitize` reshapes stored messages into a sequence that satisfies the
//!   model's turn grammar.
//! - `is_persistable` decides which newly produced messages are committed.
//! - `HistorySink` is the per-session store.

mod commit;
mod sanitize;
mod store;

#[cfg(test)]
mod proptests;

pub use commit::{is_persistable, persistable};
pub use sanitize::sanitize;
pub use store::{HistoryError, HistorySink, HistoryStore, MemoryHistory, SqliteHistory};
