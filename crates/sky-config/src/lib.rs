//! # sky-config
//!
//! Layered configuration loading for Skywatch using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SKYWATCH_*` prefix, `__` as separator)
//! 2. `NASA_API_KEY` (fallback for `nasa.api_key` only)
//! 3. Project-level `.skywatch/config.toml`
//! 4. User-level `~/.config/skywatch/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SKYWATCH_NASA__API_KEY` -> `nasa.api_key` and
//! `SKYWATCH_LLM__MODEL` -> `llm.model`.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use sky_config::SkywatchConfig;
//!
//! let config = SkywatchConfig::load_with_dotenv().expect("config");
//! println!("model: {}", config.llm.model);
//! ```

mod chat;
mod error;
mod llm;
mod nasa;

pub use chat::ChatConfig;
pub use error::ConfigError;
pub use llm::LlmConfig;
pub use nasa::{DEMO_KEY, NasaConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Process-scoped configuration, loaded once at startup and passed by reference.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SkywatchConfig {
    #[serde(default)]
    pub nasa: NasaConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl SkywatchConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source cannot be parsed and
    /// [`ConfigError::InvalidValue`] when a value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".skywatch/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: the conventional NASA key variable
        figment = figment.merge(
            Env::raw()
                .only(&["NASA_API_KEY"])
                .map(|_| "nasa.api_key".into()),
        );

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("SKYWATCH_").split("__"))
    }

    /// Check every section for values the clients cannot work with.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvalidValue`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.nasa.validate()?;
        self.llm.validate()?;
        self.chat.validate()?;
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("skywatch").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SkywatchConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.nasa.uses_demo_key());
        assert_eq!(config.chat.max_items, 3);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: SkywatchConfig = SkywatchConfig::figment().extract()?;
            assert_eq!(config.nasa.photo_limit, 5);
            assert_eq!(config.llm.timeout_secs, 60);
            Ok(())
        });
    }

    #[test]
    fn validate_covers_chat_section() {
        let mut config = SkywatchConfig::default();
        config.chat.fetch_deadline_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "chat.fetch_deadline_secs"
        ));
    }
}
