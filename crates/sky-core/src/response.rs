//! Composed answers returned to the user.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::intent::IntentKind;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bhttps?://[^\s<>()\[\]]+").expect("Invalid regex"));

/// Whether `text` contains at least one `http(s)://` URL.
#[must_use]
pub fn contains_url(text: &str) -> bool {
    URL_PATTERN.is_match(text)
}

// ---------------------------------------------------------------------------
// FailureKind
// ---------------------------------------------------------------------------

/// Category of a failed sub-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NetworkError,
    RateLimited,
    NotFound,
    InvalidResponse,
    /// The endpoint answered with data, but nothing usable.
    Empty,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::NotFound => "not_found",
            Self::InvalidResponse => "invalid_response",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An intent whose data did not make it into the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Degradation {
    pub intent: IntentKind,
    pub failure: FailureKind,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Final answer for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Response {
    pub text: String,
    /// Derived from `text` by [`contains_url`].
    pub contains_url: bool,
    /// True when at least one non-empty NASA result contributed.
    pub used_nasa_data: bool,
    /// Intents whose results made it into `text`, in intent order.
    pub sources: Vec<IntentKind>,
    /// Intents that were requested but contributed nothing.
    pub degraded: Vec<Degradation>,
}

impl Response {
    /// Build a response, deriving `contains_url` and `used_nasa_data`.
    #[must_use]
    pub fn new(text: String, sources: Vec<IntentKind>, degraded: Vec<Degradation>) -> Self {
        Self {
            contains_url: contains_url(&text),
            used_nasa_data: !sources.is_empty(),
            text,
            sources,
            degraded,
        }
    }

    /// Whether some requested NASA data is missing from the answer.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("See https://apod.nasa.gov/apod/ for more.", true)]
    #[case("Image URL: http://mars.jpl.nasa.gov/msl/x.JPG", true)]
    #[case("Black holes bend light around them.", false)]
    #[case("the protocol is called https but no link", false)]
    fn detects_urls(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(contains_url(text), expected);
    }

    #[test]
    fn response_derives_flags() {
        let response = Response::new(
            "Today's picture: https://apod.nasa.gov/a.jpg".into(),
            vec![IntentKind::Apod],
            vec![Degradation {
                intent: IntentKind::MarsRover,
                failure: FailureKind::RateLimited,
            }],
        );
        assert!(response.contains_url);
        assert!(response.used_nasa_data);
        assert!(response.is_degraded());
    }

    #[test]
    fn model_only_response_has_no_nasa_data() {
        let response =
            Response::new("Black holes are regions of spacetime.".into(), vec![], vec![]);
        assert!(!response.contains_url);
        assert!(!response.used_nasa_data);
        assert!(!response.is_degraded());
    }
}
