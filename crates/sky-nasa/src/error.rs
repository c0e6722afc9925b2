//! Fetch error types.

use sky_core::response::FailureKind;
use thiserror::Error;

/// Errors that can occur when calling a NASA endpoint.
///
/// Raw transport errors are flattened into [`FetchError::Network`] so callers
/// only ever see this closed set.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS or timeout failure.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The endpoint returned 404 for the requested resource.
    #[error("not found: {0}")]
    NotFound(String),

    /// The body was not valid JSON or lacked a required field.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Any other non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the endpoint.
        status: u16,
        /// Error message or response body.
        message: String,
    },
}

impl FetchError {
    /// Whether another attempt could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::NotFound(_) | Self::InvalidResponse(_) => false,
        }
    }

    /// Failure category recorded on degraded responses.
    #[must_use]
    pub const fn category(&self) -> FailureKind {
        match self {
            Self::Network(_) => FailureKind::NetworkError,
            Self::Api { status, .. } if *status >= 500 => FailureKind::NetworkError,
            Self::RateLimited { .. } => FailureKind::RateLimited,
            Self::NotFound(_) => FailureKind::NotFound,
            Self::Api { .. } | Self::InvalidResponse(_) => FailureKind::InvalidResponse,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::InvalidResponse(error.to_string());
        }
        // Strip the URL: it carries the api_key query parameter.
        Self::Network(error.without_url().to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidResponse(error.to_string())
    }
}
