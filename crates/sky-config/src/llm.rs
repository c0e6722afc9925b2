//! Language model endpoint configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Ollama's OpenAI-compatible chat completions endpoint.
fn default_base_url() -> String {
    String::from("http://localhost:11434/v1/chat/completions")
}

fn default_model() -> String {
    String::from("llama3.2:latest")
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_timeout_secs() -> u64 {
    60
}

fn default_system_prompt() -> String {
    String::from("You are a helpful AI assistant with knowledge about space and NASA.")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Full URL of a `/v1/chat/completions` endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer key; empty for keyless local servers.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            api_key: String::new(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl LlmConfig {
    /// The bearer key, if one is configured.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (!key.is_empty()).then_some(key)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("llm.model", "must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("llm.timeout_secs", "must be greater than 0"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::invalid(
                "llm.temperature",
                format!("{} is outside [0, 2]", self.temperature),
            ));
        }
        Ok(())
    }
}
