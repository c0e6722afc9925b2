//! Keyword-based intent classifier.
//!
//! Maps a free-text query to zero or more [`Intent`]s. Every intent kind has
//! one case-insensitive pattern; a query may match several, and the intents
//! come back ordered by where their first keyword appears. Parameters (dates,
//! rover, sol, camera, coordinates) are extracted from the same query.

use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use sky_core::intent::{
    ApodParams, Coordinates, EarthParams, Intent, IntentKind, MarsParams, NeoParams, Rover,
};

// ============================================================================
// Intent patterns
// ============================================================================

static APOD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(astronomy\s+pictures?|apod|pictures?\s+of\s+the\s+day|nasa\s+images?|nasa['’]?s\s+(picture|photo|image)s?|space\s+photos?)\b",
    )
    .expect("Invalid regex")
});
static MARS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(mars|martian|rovers?|curiosity|perseverance|opportunity|spirit)\b")
        .expect("Invalid regex")
});
static NEO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(asteroids?|near[\s-]earth|neos?|potentially\s+hazardous|impacts?|comets?|meteors?)\b",
    )
    .expect("Invalid regex")
});
static EARTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(earth\s+from\s+space|images?\s+of\s+(the\s+)?earth|earth\s+(images?|imagery|views?|photos?)|our\s+planet|blue\s+marble|epic|satellite\s+(images?|imagery)|planet\s+photos?|(planet|earth)\b[^.?!]*\bfrom\s+space)\b",
    )
    .expect("Invalid regex")
});

// ============================================================================
// Parameter patterns
// ============================================================================

static ISO_DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("Invalid regex"));
static YESTERDAY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\byesterday\b").expect("Invalid regex"));
static SOL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsol\s*(\d{1,5})\b").expect("Invalid regex"));
static CAMERA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(fhaz|rhaz|mast|chemcam|mahli|mardi|navcam|pancam|minites)\b")
        .expect("Invalid regex")
});
static COORDINATES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\blat(?:itude)?\s*[:=]?\s*(-?\d+(?:\.\d+)?)\s*,?\s*lon(?:gitude)?\s*[:=]?\s*(-?\d+(?:\.\d+)?)",
    )
    .expect("Invalid regex")
});

// ============================================================================
// Intent Classifier
// ============================================================================

/// Classifies natural language queries into NASA API intents.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    /// Length of the NEO window built around an extracted date.
    neo_window_days: u64,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(7)
    }
}

impl IntentClassifier {
    #[must_use]
    pub const fn new(neo_window_days: u64) -> Self {
        Self { neo_window_days }
    }

    /// Classify `query`, resolving relative dates against today.
    ///
    /// An empty result means the query is off-topic. Never fails.
    #[must_use]
    pub fn classify(&self, query: &str) -> Vec<Intent> {
        self.classify_at(query, chrono::Local::now().date_naive())
    }

    /// Classify `query`, resolving relative dates against `today`.
    #[must_use]
    pub fn classify_at(&self, query: &str, today: NaiveDate) -> Vec<Intent> {
        let mut hits: Vec<(usize, IntentKind)> = [
            (IntentKind::Apod, &*APOD_PATTERN),
            (IntentKind::MarsRover, &*MARS_PATTERN),
            (IntentKind::Neo, &*NEO_PATTERN),
            (IntentKind::EarthImagery, &*EARTH_PATTERN),
        ]
        .into_iter()
        .filter_map(|(kind, pattern)| pattern.find(query).map(|m| (m.start(), kind)))
        .collect();
        hits.sort_by_key(|(offset, _)| *offset);

        if hits.is_empty() {
            tracing::debug!(query, "no intent matched");
            return Vec::new();
        }

        let date = extract_date(query, today);
        hits.into_iter()
            .map(|(_, kind)| self.build_intent(kind, query, date))
            .collect()
    }

    fn build_intent(&self, kind: IntentKind, query: &str, date: Option<NaiveDate>) -> Intent {
        match kind {
            IntentKind::Apod => Intent::Apod(ApodParams { date }),
            IntentKind::MarsRover => Intent::MarsRover(MarsParams {
                rover: extract_rover(query),
                earth_date: date,
                sol: SOL_PATTERN
                    .captures(query)
                    .and_then(|caps| caps.get(1))
                    .and_then(|m| m.as_str().parse().ok()),
                camera: CAMERA_PATTERN
                    .find(query)
                    .map(|m| m.as_str().to_ascii_uppercase()),
            }),
            IntentKind::Neo => Intent::Neo(date.map_or_else(NeoParams::default, |d| {
                NeoParams::window(d, self.neo_window_days)
            })),
            IntentKind::EarthImagery => Intent::EarthImagery(EarthParams {
                date,
                coordinates: extract_coordinates(query),
            }),
        }
    }
}

/// First valid ISO date in the query, else "yesterday" relative to `today`.
///
/// "today" and no date at all both leave the date to the client.
fn extract_date(query: &str, today: NaiveDate) -> Option<NaiveDate> {
    let iso = ISO_DATE_PATTERN.captures_iter(query).find_map(|caps| {
        let year = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2)?.as_str().parse().ok()?;
        let day = caps.get(3)?.as_str().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    });
    iso.or_else(|| {
        YESTERDAY_PATTERN
            .is_match(query)
            .then(|| today.checked_sub_days(Days::new(1)))
            .flatten()
    })
}

fn extract_rover(query: &str) -> Rover {
    let lower = query.to_lowercase();
    [Rover::Perseverance, Rover::Opportunity, Rover::Spirit]
        .into_iter()
        .find(|rover| lower.contains(rover.as_str()))
        .unwrap_or_default()
}

fn extract_coordinates(query: &str) -> Option<Coordinates> {
    let caps = COORDINATES_PATTERN.captures(query)?;
    let lat = caps.get(1)?.as_str().parse().ok()?;
    let lon = caps.get(2)?.as_str().parse().ok()?;
    Coordinates::new(lat, lon).ok()
}
