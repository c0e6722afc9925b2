use anyhow::Context;
use sky_chat::Composer;
use sky_config::SkywatchConfig;

use crate::bootstrap;
use crate::cli::root_commands::FetchArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;
use crate::progress::Progress;

/// Handle `skywatch fetch`.
///
/// Goes through the same request validation as the `nasa_api` tool, then
/// calls one endpoint without the model.
pub async fn handle(
    args: &FetchArgs,
    config: &SkywatchConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let intent = args
        .to_request()
        .into_intent(config.nasa.neo_window_days)
        .context("invalid fetch arguments")?;
    let client = bootstrap::nasa_client(config)?;

    let spinner = Progress::spinner(&format!("Fetching {}...", intent.kind().label()));
    let result = client.fetch(&intent).await;
    spinner.finish_clear();
    let result = result.with_context(|| format!("{} request failed", intent.kind().label()))?;

    if flags.format == OutputFormat::Table {
        if result.is_empty() {
            println!("NASA returned no {} data for that request.", intent.kind().label());
            return Ok(());
        }
        let composer = Composer::new(&config.chat, config.llm.system_prompt.clone());
        println!("{}", composer.fact_section(&result));
        return Ok(());
    }

    output(&result, flags.format)
}
