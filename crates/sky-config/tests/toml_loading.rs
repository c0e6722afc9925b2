//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var and cwd manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use sky_config::SkywatchConfig;

#[test]
fn loads_nasa_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[nasa]
api_key = "toml-key"
base_url = "http://localhost:8080"
timeout_secs = 3
max_retries = 0
photo_limit = 2
neo_count = 10
"#,
        )?;

        let config: SkywatchConfig = Figment::from(Serialized::defaults(SkywatchConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.nasa.api_key, "toml-key");
        assert_eq!(config.nasa.base_url, "http://localhost:8080");
        assert_eq!(config.nasa.timeout_secs, 3);
        assert_eq!(config.nasa.max_retries, 0);
        assert_eq!(config.nasa.photo_limit, 2);
        assert_eq!(config.nasa.neo_count, 10);
        // untouched keys keep their defaults
        assert_eq!(config.nasa.neo_window_days, 7);
        assert!(!config.nasa.uses_demo_key());
        Ok(())
    });
}

#[test]
fn loads_llm_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[llm]
base_url = "https://api.openai.com/v1/chat/completions"
model = "gpt-4o-mini"
temperature = 0.2
api_key = "sk-test"
"#,
        )?;

        let config: SkywatchConfig = Figment::from(Serialized::defaults(SkywatchConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key(), Some("sk-test"));
        assert!((config.llm.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.llm.timeout_secs, 60);
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        jail.create_dir(".skywatch")?;
        jail.create_file(
            ".skywatch/config.toml",
            r#"
[chat]
max_items = 5
facts_only = true
"#,
        )?;

        let config = SkywatchConfig::load().expect("config loads");
        assert_eq!(config.chat.max_items, 5);
        assert!(config.chat.facts_only);
        assert_eq!(config.chat.description_limit, 500);
        Ok(())
    });
}

#[test]
fn malformed_toml_is_an_error() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        jail.create_dir(".skywatch")?;
        jail.create_file(".skywatch/config.toml", "[nasa\napi_key = ")?;

        assert!(SkywatchConfig::load().is_err());
        Ok(())
    });
}
