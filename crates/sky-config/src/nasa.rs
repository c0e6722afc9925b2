//! NASA Open APIs configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Key accepted by api.nasa.gov without registration (heavily rate limited).
pub const DEMO_KEY: &str = "DEMO_KEY";

fn default_api_key() -> String {
    String::from(DEMO_KEY)
}

fn default_base_url() -> String {
    String::from("https://api.nasa.gov")
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_backoff_ms() -> u64 {
    500
}

const fn default_max_backoff_ms() -> u64 {
    5_000
}

const fn default_photo_limit() -> usize {
    5
}

const fn default_neo_count() -> usize {
    5
}

const fn default_neo_window_days() -> u64 {
    7
}

const fn default_epic_image_limit() -> usize {
    3
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NasaConfig {
    /// api.nasa.gov key. Falls back to `NASA_API_KEY`, then `DEMO_KEY`.
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Base URL for every endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for network errors, 5xx and rate limiting.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First retry delay; doubles on each attempt.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Upper bound on a single retry delay.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Mars photos kept per request.
    #[serde(default = "default_photo_limit")]
    pub photo_limit: usize,

    /// Closest approaches kept from the NEO feed.
    #[serde(default = "default_neo_count")]
    pub neo_count: usize,

    /// Width of the NEO feed window. The feed rejects windows over 7 days.
    #[serde(default = "default_neo_window_days")]
    pub neo_window_days: u64,

    /// EPIC images kept per request.
    #[serde(default = "default_epic_image_limit")]
    pub epic_image_limit: usize,
}

impl Default for NasaConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            photo_limit: default_photo_limit(),
            neo_count: default_neo_count(),
            neo_window_days: default_neo_window_days(),
            epic_image_limit: default_epic_image_limit(),
        }
    }
}

impl NasaConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether the shared demo key is in use.
    #[must_use]
    pub fn uses_demo_key(&self) -> bool {
        self.api_key == DEMO_KEY
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::invalid("nasa.api_key", "must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::invalid(
                "nasa.base_url",
                format!("'{}' is not an http(s) URL", self.base_url),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("nasa.timeout_secs", "must be greater than 0"));
        }
        if self.max_backoff_ms < self.backoff_ms {
            return Err(ConfigError::invalid(
                "nasa.max_backoff_ms",
                "must be at least nasa.backoff_ms",
            ));
        }
        for (field, value) in [
            ("nasa.photo_limit", self.photo_limit),
            ("nasa.neo_count", self.neo_count),
            ("nasa.epic_image_limit", self.epic_image_limit),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }
        if !(1..=7).contains(&self.neo_window_days) {
            return Err(ConfigError::invalid(
                "nasa.neo_window_days",
                "must be between 1 and 7",
            ));
        }
        Ok(())
    }
}
