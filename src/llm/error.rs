//! Error type shared by every LLM client implementation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to a completion service. Every
/// variant is a per-step transport failure for the reasoning loop: recorded
/// in the trace, never fatal to the run.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum LlmError {
    /// API request failed with the given message
    #[error("API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    /// Request timed out after the specified duration (in seconds)
    #[error("request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Generic error for other cases
    #[error("{message}")]
    Other { message: String },
}
