//! Batch report types returned by `skywatch report`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::intent::IntentKind;

/// A fixed query of the batch suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportCase {
    pub id: u32,
    pub category: &'static str,
    pub query: &'static str,
    /// Intents a correct classifier is expected to produce, in order.
    pub expected: &'static [IntentKind],
    pub description: &'static str,
}

/// The ten-query suite covering every endpoint, a multi-intent query and an
/// off-topic query.
pub const REPORT_CASES: [ReportCase; 10] = [
    ReportCase {
        id: 1,
        category: "APOD",
        query: "What is today's astronomy picture of the day?",
        expected: &[IntentKind::Apod],
        description: "Basic query for Astronomy Picture of the Day",
    },
    ReportCase {
        id: 2,
        category: "APOD",
        query: "Show me NASA's picture from 2022-12-25",
        expected: &[IntentKind::Apod],
        description: "APOD query with specific date",
    },
    ReportCase {
        id: 3,
        category: "Mars Rover",
        query: "What photos did Curiosity rover take recently?",
        expected: &[IntentKind::MarsRover],
        description: "Basic Mars rover query",
    },
    ReportCase {
        id: 4,
        category: "Mars Rover",
        query: "Show me pictures from Perseverance rover on Mars",
        expected: &[IntentKind::MarsRover],
        description: "Mars rover query with specific rover",
    },
    ReportCase {
        id: 5,
        category: "Near Earth Objects",
        query: "Are there any asteroids passing near Earth this week?",
        expected: &[IntentKind::Neo],
        description: "Basic NEO query",
    },
    ReportCase {
        id: 6,
        category: "Near Earth Objects",
        query: "Tell me about potentially hazardous asteroids",
        expected: &[IntentKind::Neo],
        description: "NEO query about hazardous objects",
    },
    ReportCase {
        id: 7,
        category: "Earth Imagery",
        query: "Show me images of Earth from space",
        expected: &[IntentKind::EarthImagery],
        description: "Basic Earth imagery query",
    },
    ReportCase {
        id: 8,
        category: "Earth Imagery",
        query: "What does our planet look like from space?",
        expected: &[IntentKind::EarthImagery],
        description: "Alternative phrasing for Earth imagery",
    },
    ReportCase {
        id: 9,
        category: "Multi-Intent",
        query: "Tell me about the Mars rover and show me today's astronomy picture",
        expected: &[IntentKind::MarsRover, IntentKind::Apod],
        description: "Query with multiple API matches",
    },
    ReportCase {
        id: 10,
        category: "Off-Topic",
        query: "Tell me about black holes",
        expected: &[],
        description: "Space query not related to a NASA API",
    },
];

/// Outcome of one suite query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportRow {
    pub id: u32,
    pub category: String,
    pub query: String,
    pub intents: Vec<IntentKind>,
    /// Whether `intents` equals the expected intents of the case.
    pub classified_as_expected: bool,
    pub used_nasa_data: bool,
    pub contains_url: bool,
    pub degraded: bool,
    pub response_chars: usize,
    /// Length of a model-only answer, when the baseline was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_chars: Option<usize>,
    pub response: String,
}

/// Per-category tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryStats {
    pub category: String,
    pub total: u32,
    pub used_nasa_data: u32,
}

/// Totals across the whole suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportSummary {
    pub total: u32,
    pub used_nasa_data: u32,
    pub contains_url: u32,
    pub classified_as_expected: u32,
    pub nasa_data_pct: f64,
    pub url_pct: f64,
    pub categories: Vec<CategoryStats>,
}

impl ReportSummary {
    /// Tally rows, keeping categories in first-seen order.
    #[must_use]
    pub fn from_rows(rows: &[ReportRow]) -> Self {
        let mut categories: Vec<CategoryStats> = Vec::new();
        for row in rows {
            let index = if let Some(index) = categories
                .iter()
                .position(|c| c.category == row.category)
            {
                index
            } else {
                categories.push(CategoryStats {
                    category: row.category.clone(),
                    total: 0,
                    used_nasa_data: 0,
                });
                categories.len() - 1
            };
            let stats = &mut categories[index];
            stats.total += 1;
            stats.used_nasa_data += u32::from(row.used_nasa_data);
        }

        let count = |pred: fn(&ReportRow) -> bool| {
            u32::try_from(rows.iter().filter(|r| pred(r)).count()).unwrap_or(u32::MAX)
        };
        let total = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        let used_nasa_data = count(|r| r.used_nasa_data);
        let contains_url = count(|r| r.contains_url);

        Self {
            total,
            used_nasa_data,
            contains_url,
            classified_as_expected: count(|r| r.classified_as_expected),
            nasa_data_pct: percent(used_nasa_data, total),
            url_pct: percent(contains_url, total),
            categories,
        }
    }
}

fn percent(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(total) * 100.0
    }
}

/// Full report: per-query rows plus the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportResponse {
    pub summary: ReportSummary,
    pub rows: Vec<ReportRow>,
}
