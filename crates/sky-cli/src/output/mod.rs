use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;
use sky_core::report::ReportResponse;
use sky_core::response::Response;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

/// Render a serializable value to a string in the requested format.
///
/// `Table` falls back to a key/value listing of the top-level fields.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_key_values(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable value in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_key_values<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let rows = match serde_json::to_value(value)? {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| vec![key, value_to_cell(&value)])
            .collect::<Vec<_>>(),
        scalar => vec![vec![String::from("value"), value_to_cell(&scalar)]],
    };
    Ok(table::render_table(&["key", "value"], &rows, table_options()))
}

/// Render an answer: the text itself, then its flags.
pub fn render_response(response: &Response, format: OutputFormat) -> anyhow::Result<String> {
    if format != OutputFormat::Table {
        return render(response, format);
    }

    let sources = if response.sources.is_empty() {
        String::from("-")
    } else {
        response.sources.iter().map(|k| k.label()).collect::<Vec<_>>().join(", ")
    };
    let degraded = if response.degraded.is_empty() {
        String::from("-")
    } else {
        response
            .degraded
            .iter()
            .map(|d| format!("{} ({})", d.intent.label(), d.failure))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let rows = vec![
        vec![String::from("sources"), sources],
        vec![String::from("used_nasa_data"), yes_no(response.used_nasa_data)],
        vec![String::from("contains_url"), yes_no(response.contains_url)],
        vec![String::from("degraded"), degraded],
    ];

    Ok(format!(
        "{}\n\n{}",
        response.text,
        table::render_table(&["key", "value"], &rows, table_options())
    ))
}

/// Render the batch report: one row per query, then the summary.
pub fn render_report(report: &ReportResponse, format: OutputFormat) -> anyhow::Result<String> {
    if format != OutputFormat::Table {
        return render(report, format);
    }

    let with_baseline = report.rows.iter().any(|r| r.baseline_chars.is_some());
    let mut headers = vec!["id", "category", "query", "intents", "nasa data", "url", "chars"];
    if with_baseline {
        headers.push("baseline");
    }

    let rows = report
        .rows
        .iter()
        .map(|row| {
            let intents = if row.intents.is_empty() {
                String::from("-")
            } else {
                row.intents.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(",")
            };
            let mut cells = vec![
                row.id.to_string(),
                row.category.clone(),
                row.query.clone(),
                intents,
                yes_no(row.used_nasa_data),
                yes_no(row.contains_url),
                row.response_chars.to_string(),
            ];
            if with_baseline {
                cells.push(row.baseline_chars.map_or_else(|| String::from("-"), |c| c.to_string()));
            }
            cells
        })
        .collect::<Vec<_>>();

    let summary = &report.summary;
    let mut out = table::render_table(&headers, &rows, table_options());
    let _ = write!(
        out,
        "\n\n{} of {} queries used NASA data ({:.1}%), {} included URLs ({:.1}%), {} classified as expected.",
        summary.used_nasa_data,
        summary.total,
        summary.nasa_data_pct,
        summary.contains_url,
        summary.url_pct,
        summary.classified_as_expected
    );
    for stats in &summary.categories {
        let _ = write!(
            out,
            "\n- {}: {}/{} used NASA data",
            stats.category, stats.used_nasa_data, stats.total
        );
    }
    Ok(out)
}

fn yes_no(value: bool) -> String {
    String::from(if value { "yes" } else { "no" })
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}
