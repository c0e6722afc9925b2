//! Cross-cutting error types for Skywatch.
//!
//! Transport failures live in `sky-nasa` (`FetchError`) and `sky-llm`
//! (`LlmError`). `sky-cli` converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised while building intents or parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The endpoint name did not match any known endpoint or alias.
    #[error("Unknown NASA endpoint: {0}")]
    UnknownEndpoint(String),

    /// The rover name is not one of the Mars rovers served by the API.
    #[error("Unknown Mars rover: {0}")]
    UnknownRover(String),

    /// A parameter failed validation (format, range).
    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParameter { field: String, reason: String },
}
