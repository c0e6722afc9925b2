//! NASA endpoint names and their accepted aliases.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::intent::IntentKind;

/// NASA endpoint addressable by name from the CLI and the tool interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NasaEndpoint {
    Apod,
    MarsPhotos,
    Neo,
    Earth,
}

impl NasaEndpoint {
    pub const ALL: [Self; 4] = [Self::Apod, Self::MarsPhotos, Self::Neo, Self::Earth];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apod => "apod",
            Self::MarsPhotos => "mars_photos",
            Self::Neo => "neo",
            Self::Earth => "earth",
        }
    }

    #[must_use]
    pub const fn intent_kind(self) -> IntentKind {
        match self {
            Self::Apod => IntentKind::Apod,
            Self::MarsPhotos => IntentKind::MarsRover,
            Self::Neo => IntentKind::Neo,
            Self::Earth => IntentKind::EarthImagery,
        }
    }
}

impl fmt::Display for NasaEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NasaEndpoint {
    type Err = CoreError;

    /// Accepts canonical names plus spaced, dashed and underscored variants
    /// (`"mars rover"`, `"near-earth-objects"`, `"astronomy_picture_of_the_day"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace(['-', ' '], "_");

        match normalized.as_str() {
            "apod" | "astronomy_picture_of_the_day" | "astronomy_picture" => Ok(Self::Apod),
            "mars_photos" | "mars_rover" | "mars" | "rover" => Ok(Self::MarsPhotos),
            "neo" | "near_earth_objects" | "near_earth_object" | "asteroids" => Ok(Self::Neo),
            "earth" | "earth_imagery" | "epic" | "landsat" => Ok(Self::Earth),
            _ => Err(CoreError::UnknownEndpoint(s.to_string())),
        }
    }
}
