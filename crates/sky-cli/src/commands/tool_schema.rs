use sky_core::tool::tool_definition;

use crate::cli::{GlobalFlags, OutputFormat};

/// Handle `skywatch tool-schema`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    let definition = tool_definition();
    let rendered = match flags.format {
        OutputFormat::Raw => serde_json::to_string(&definition)?,
        OutputFormat::Json | OutputFormat::Table => serde_json::to_string_pretty(&definition)?,
    };
    println!("{rendered}");
    Ok(())
}
