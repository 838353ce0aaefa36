//! Order status lookup and classification
//!
//! The backend returns a raw record; the classifier maps it to exactly one
//! outcome: a scripted reply the model must echo, a transfer to an operator,
//! not-found, or a sanitized pass-through of the record.

mod backend;
mod classifier;
mod record;
pub mod templates;

#[cfg(test)]
mod proptests;

pub use backend::{HttpOrderBackend, OrderBackend, OrderLookupError};
pub use classifier::{
    classify, classify_lookup, Carrier, DeliveryZone, ScriptedReply, StatusOutcome,
    TransferReason,
};
pub use record::{OrderRecord, PII_FIELDS};
