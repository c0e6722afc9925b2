use sky_config::SkywatchConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &SkywatchConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Chat => commands::chat::handle(config, flags).await,
        Commands::Ask(args) => commands::ask::handle(&args, config, flags).await,
        Commands::Fetch(args) => commands::fetch::handle(&args, config, flags).await,
        Commands::Report(args) => commands::report::handle(&args, config, flags).await,
        Commands::ToolSchema => unreachable!("tool-schema is pre-dispatched in main"),
    }
}
