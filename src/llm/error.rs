//! Decision service errors
//!
//! Every variant is fatal for the turn: the runtime never retries a model call.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlmError {
    /// Could not reach the endpoint or read its reply
    #[error("decision service unreachable: {0}")]
    Transport(String),
    #[error("decision service rejected credentials: {0}")]
    Auth(String),
    #[error("decision service rate limited: {0}")]
    RateLimited(String),
    #[error("decision request rejected: {0}")]
    InvalidRequest(String),
    #[error("decision service failed with HTTP {status}: {message}")]
    Upstream { status: u16, message: String },
    /// The reply parsed as HTTP success but carried no usable decision
    #[error("unusable decision response: {0}")]
    Malformed(String),
}

impl LlmError {
    /// Map a non-success HTTP status
    pub fn from_status(status: u16, message: &str) -> Self {
        let message = message.to_string();
        match status {
            401 | 403 => Self::Auth(message),
            429 => Self::RateLimited(message),
            400 => Self::InvalidRequest(message),
            _ => Self::Upstream { status, message },
        }
    }
}
