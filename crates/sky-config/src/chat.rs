//! Response composition settings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Characters of an APOD explanation kept before truncating with `...`.
const fn default_description_limit() -> usize {
    500
}

/// Photos, objects or images listed per section.
const fn default_max_items() -> usize {
    3
}

/// Per sub-fetch deadline, in seconds, on top of retries.
const fn default_fetch_deadline_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default = "default_description_limit")]
    pub description_limit: usize,

    #[serde(default = "default_max_items")]
    pub max_items: usize,

    #[serde(default = "default_fetch_deadline_secs")]
    pub fetch_deadline_secs: u64,

    /// Skip the model and answer with the NASA fact sections only.
    #[serde(default)]
    pub facts_only: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            description_limit: default_description_limit(),
            max_items: default_max_items(),
            fetch_deadline_secs: default_fetch_deadline_secs(),
            facts_only: false,
        }
    }
}

impl ChatConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_deadline_secs == 0 {
            return Err(ConfigError::invalid(
                "chat.fetch_deadline_secs",
                "must be greater than 0",
            ));
        }
        if self.max_items == 0 {
            return Err(ConfigError::invalid("chat.max_items", "must be at least 1"));
        }
        if self.description_limit == 0 {
            return Err(ConfigError::invalid(
                "chat.description_limit",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
