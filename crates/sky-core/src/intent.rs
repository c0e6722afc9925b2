//! Intent tags and the parameters extracted alongside them.
//!
//! An [`Intent`] carries its parameters in the variant, so a Mars rover intent
//! can never be paired with APOD parameters. [`IntentKind`] is the bare tag
//! used for reporting and degradation notes.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// IntentKind
// ---------------------------------------------------------------------------

/// NASA data source a query maps to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Apod,
    MarsRover,
    Neo,
    EarthImagery,
}

impl IntentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apod => "apod",
            Self::MarsRover => "mars_rover",
            Self::Neo => "neo",
            Self::EarthImagery => "earth_imagery",
        }
    }

    /// Human-readable source name used in reports and log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Apod => "APOD",
            Self::MarsRover => "Mars Rover",
            Self::Neo => "Near Earth Objects",
            Self::EarthImagery => "Earth Imagery",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rover
// ---------------------------------------------------------------------------

/// Mars rovers served by the Mars Rover Photos API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Rover {
    #[default]
    Curiosity,
    Opportunity,
    Spirit,
    Perseverance,
}

impl Rover {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Curiosity => "curiosity",
            Self::Opportunity => "opportunity",
            Self::Spirit => "spirit",
            Self::Perseverance => "perseverance",
        }
    }
}

impl fmt::Display for Rover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rover {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "curiosity" => Ok(Self::Curiosity),
            "opportunity" => Ok(Self::Opportunity),
            "spirit" => Ok(Self::Spirit),
            "perseverance" => Ok(Self::Perseverance),
            other => Err(CoreError::UnknownRover(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Parameters for the Astronomy Picture of the Day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApodParams {
    /// Picture date; `None` means today.
    pub date: Option<NaiveDate>,
}

/// Parameters for Mars rover photos.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MarsParams {
    pub rover: Rover,
    /// Earth date of the photos; ignored when `sol` is set.
    pub earth_date: Option<NaiveDate>,
    /// Martian sol of the photos.
    pub sol: Option<u32>,
    /// Camera abbreviation (e.g. `FHAZ`, `NAVCAM`).
    pub camera: Option<String>,
}

/// Parameters for the Near Earth Object feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NeoParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Number of closest approaches to keep.
    pub count: Option<usize>,
}

impl NeoParams {
    /// Build a window of `days` starting at `start`.
    #[must_use]
    pub fn window(start: NaiveDate, days: u64) -> Self {
        Self {
            start_date: Some(start),
            end_date: start.checked_add_days(Days::new(days)),
            count: None,
        }
    }
}

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Validate ranges and build coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidParameter`] when latitude is outside
    /// `[-90, 90]` or longitude outside `[-180, 180]`.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoreError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoreError::InvalidParameter {
                field: "lat".into(),
                reason: format!("{lat} is outside [-90, 90]"),
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoreError::InvalidParameter {
                field: "lon".into(),
                reason: format!("{lon} is outside [-180, 180]"),
            });
        }
        Ok(Self { lat, lon })
    }
}

/// Parameters for Earth imagery.
///
/// Without coordinates the EPIC full-disc camera is used; with coordinates the
/// Landsat asset lookup is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EarthParams {
    pub date: Option<NaiveDate>,
    pub coordinates: Option<Coordinates>,
}

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// Classified purpose of a query together with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    Apod(ApodParams),
    MarsRover(MarsParams),
    Neo(NeoParams),
    EarthImagery(EarthParams),
}

impl Intent {
    #[must_use]
    pub const fn kind(&self) -> IntentKind {
        match self {
            Self::Apod(_) => IntentKind::Apod,
            Self::MarsRover(_) => IntentKind::MarsRover,
            Self::Neo(_) => IntentKind::Neo,
            Self::EarthImagery(_) => IntentKind::EarthImagery,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rover_parses_case_insensitively() {
        assert_eq!("Perseverance".parse::<Rover>(), Ok(Rover::Perseverance));
        assert_eq!(" spirit ".parse::<Rover>(), Ok(Rover::Spirit));
        assert!(matches!(
            "sojourner".parse::<Rover>(),
            Err(CoreError::UnknownRover(_))
        ));
    }

    #[test]
    fn neo_window_spans_requested_days() {
        let start = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();
        let params = NeoParams::window(start, 7);
        assert_eq!(params.start_date, Some(start));
        assert_eq!(params.end_date, NaiveDate::from_ymd_opt(2025, 1, 4));
    }

    #[test]
    fn coordinates_reject_out_of_range() {
        assert!(Coordinates::new(40.71, -74.0).is_ok());
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
    }

    #[test]
    fn intent_serializes_with_kind_tag() {
        let intent = Intent::Apod(ApodParams {
            date: NaiveDate::from_ymd_opt(2022, 12, 25),
        });
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["kind"], "apod");
        assert_eq!(json["date"], "2022-12-25");
        assert_eq!(intent.kind(), IntentKind::Apod);
    }
}
