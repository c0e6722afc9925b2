//! Language model error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    /// Connection refused, TLS failure or timeout.
    #[error("model endpoint unreachable: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("model endpoint returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The body could not be parsed as a chat completion.
    #[error("invalid completion response: {0}")]
    InvalidResponse(String),

    /// The completion had no text in its first choice.
    #[error("completion contained no text")]
    EmptyContent,
}

impl From<reqwest::Error> for LlmError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::InvalidResponse(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}
