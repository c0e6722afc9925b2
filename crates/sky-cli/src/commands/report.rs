use std::path::Path;

use anyhow::Context;
use sky_chat::{render_markdown, run_report};
use sky_config::SkywatchConfig;
use sky_core::report::{REPORT_CASES, ReportResponse};

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReportArgs;
use crate::output::render_report;
use crate::progress::Progress;

/// Handle `skywatch report`.
pub async fn handle(
    args: &ReportArgs,
    config: &SkywatchConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut session = bootstrap::session(config)?;

    let progress = Progress::bar(REPORT_CASES.len() as u64, "Running report");
    let report = run_report(&mut session, args.baseline, |row| {
        progress.inc(1);
        progress.set_message(&row.category);
    })
    .await;
    progress.finish_clear();

    if let Some(dir) = &args.output_dir {
        let written = write_report_files(&report, dir)?;
        tracing::info!(dir = %dir.display(), files = written.len(), "report written");
    }

    println!("{}", render_report(&report, flags.format)?);
    Ok(())
}

/// Write `report.json` and `report.md` into `dir`, creating it if needed.
fn write_report_files(
    report: &ReportResponse,
    dir: &Path,
) -> anyhow::Result<Vec<std::path::PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create report directory {}", dir.display()))?;

    let json_path = dir.join("report.json");
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&json_path, json)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    let md_path = dir.join("report.md");
    std::fs::write(&md_path, render_markdown(report))
        .with_context(|| format!("failed to write {}", md_path.display()))?;

    Ok(vec![json_path, md_path])
}
