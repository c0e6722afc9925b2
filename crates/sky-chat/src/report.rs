//! Batch report over the fixed query suite.

use std::fmt::Write as _;

use sky_core::intent::{Intent, IntentKind};
use sky_core::report::{REPORT_CASES, ReportCase, ReportResponse, ReportRow, ReportSummary};

use crate::session::ChatSession;
use crate::source::{DataSource, LanguageModel};

/// Run every case of [`REPORT_CASES`] through `session`, in order.
///
/// With `baseline`, each query is also answered by the model alone and the
/// length of that answer is recorded. `on_row` is called as each case
/// finishes, with its row.
pub async fn run_report<S, M, F>(
    session: &mut ChatSession<S, M>,
    baseline: bool,
    mut on_row: F,
) -> ReportResponse
where
    S: DataSource,
    M: LanguageModel,
    F: FnMut(&ReportRow),
{
    let mut rows = Vec::with_capacity(REPORT_CASES.len());
    for case in &REPORT_CASES {
        let row = run_case(session, case, baseline).await;
        on_row(&row);
        rows.push(row);
    }
    let summary = ReportSummary::from_rows(&rows);
    tracing::debug!(
        total = summary.total,
        used_nasa_data = summary.used_nasa_data,
        "report finished"
    );
    ReportResponse { summary, rows }
}

async fn run_case<S: DataSource, M: LanguageModel>(
    session: &mut ChatSession<S, M>,
    case: &ReportCase,
    baseline: bool,
) -> ReportRow {
    let intents = session.classifier().classify(case.query);
    let kinds: Vec<IntentKind> = intents.iter().map(Intent::kind).collect();
    let response = session.handle_intents(case.query, &intents).await;

    let baseline_chars = if baseline {
        session.baseline(case.query).await.map(|text| text.chars().count())
    } else {
        None
    };

    ReportRow {
        id: case.id,
        category: case.category.to_string(),
        query: case.query.to_string(),
        classified_as_expected: kinds == case.expected,
        intents: kinds,
        used_nasa_data: response.used_nasa_data,
        contains_url: response.contains_url,
        degraded: response.is_degraded(),
        response_chars: response.text.chars().count(),
        baseline_chars,
        response: response.text,
    }
}

const fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Render the report as a Markdown document.
#[must_use]
pub fn render_markdown(report: &ReportResponse) -> String {
    let summary = &report.summary;
    let mut out = String::from("# NASA API Integration Report\n\n## Summary\n\n");
    let _ = writeln!(out, "- Total queries: {}", summary.total);
    let _ = writeln!(
        out,
        "- Queries that used NASA data: {} ({:.1}%)",
        summary.used_nasa_data, summary.nasa_data_pct
    );
    let _ = writeln!(
        out,
        "- Responses that included URLs: {} ({:.1}%)",
        summary.contains_url, summary.url_pct
    );
    let _ = writeln!(
        out,
        "- Classified as expected: {}/{}",
        summary.classified_as_expected, summary.total
    );

    out.push_str("\n## By Category\n\n| Category | Used NASA Data |\n|----------|----------------|\n");
    for stats in &summary.categories {
        let _ = writeln!(out, "| {} | {}/{} |", stats.category, stats.used_nasa_data, stats.total);
    }

    out.push_str(
        "\n## Detailed Results\n\n\
         | ID | Category | Query | Intents | Used NASA Data | Contains URL | Chars | Baseline Chars |\n\
         |----|----------|-------|---------|----------------|--------------|-------|----------------|\n",
    );
    for row in &report.rows {
        let intents = if row.intents.is_empty() {
            "-".to_string()
        } else {
            row.intents.iter().map(|k| k.label()).collect::<Vec<_>>().join(", ")
        };
        let baseline = row
            .baseline_chars
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} | {} |",
            row.id,
            row.category,
            row.query.replace('|', "\\|"),
            intents,
            yes_no(row.used_nasa_data),
            yes_no(row.contains_url),
            row.response_chars,
            baseline
        );
    }
    out
}
