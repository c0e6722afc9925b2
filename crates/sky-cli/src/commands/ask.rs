use sky_config::SkywatchConfig;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::AskArgs;
use crate::output::render_response;
use crate::progress::Progress;

/// Handle `skywatch ask`.
pub async fn handle(
    args: &AskArgs,
    config: &SkywatchConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let query = args.query();
    if query.trim().is_empty() {
        anyhow::bail!("question is empty");
    }

    let mut session = bootstrap::session(config)?;
    let spinner = Progress::spinner("Asking NASA...");
    let response = session.handle(&query).await;
    spinner.finish_clear();

    println!("{}", render_response(&response, flags.format)?);
    Ok(())
}
