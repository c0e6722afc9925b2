use anyhow::Context;
use sky_chat::ChatSession;
use sky_config::SkywatchConfig;
use sky_llm::LlmClient;
use sky_nasa::NasaClient;

/// The production session: NASA over HTTP, an OpenAI-compatible model.
pub type Session = ChatSession<NasaClient, LlmClient>;

/// Load `.env`, then the layered configuration.
pub fn load_config() -> anyhow::Result<SkywatchConfig> {
    let config =
        SkywatchConfig::load_with_dotenv().context("failed to load skywatch configuration")?;
    warn_unconfigured(&config);
    Ok(config)
}

pub fn nasa_client(config: &SkywatchConfig) -> anyhow::Result<NasaClient> {
    NasaClient::new(config.nasa.clone()).context("failed to build NASA client")
}

pub fn llm_client(config: &SkywatchConfig) -> anyhow::Result<LlmClient> {
    LlmClient::new(&config.llm).context("failed to build language model client")
}

pub fn session(config: &SkywatchConfig) -> anyhow::Result<Session> {
    Ok(ChatSession::new(config, nasa_client(config)?, llm_client(config)?))
}

/// Emit warnings for settings that silently fell back to defaults.
fn warn_unconfigured(config: &SkywatchConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &SkywatchConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if config.nasa.uses_demo_key() {
        if has_env_prefix(&env_keys, "SKYWATCH_NASA_") {
            warnings.push(
                "NASA config appears default while SKYWATCH_NASA_* env vars exist. Use double underscores (example: SKYWATCH_NASA__API_KEY)."
                    .to_string(),
            );
        } else {
            warnings.push(
                "Using NASA's DEMO_KEY, which is heavily rate limited. Set NASA_API_KEY for a personal key."
                    .to_string(),
            );
        }
    }

    if config.llm.api_key().is_none() && has_env_prefix(&env_keys, "SKYWATCH_LLM_") {
        warnings.push(
            "LLM config may be ignored: SKYWATCH_LLM_* env vars exist. Use double underscores (example: SKYWATCH_LLM__MODEL)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
