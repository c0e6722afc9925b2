//! Typed NASA API results, one variant per endpoint.
//!
//! Optional fields stay `Option` all the way to the composer; nothing is
//! defaulted on receipt. Required fields are checked by the clients in
//! `sky-nasa` before a result is constructed.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::intent::{Coordinates, IntentKind, Rover};

/// Astronomy Picture of the Day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApodResult {
    pub title: String,
    pub date: NaiveDate,
    pub explanation: Option<String>,
    pub url: Option<String>,
    pub hd_url: Option<String>,
    pub media_type: Option<String>,
    pub copyright: Option<String>,
}

/// One Mars rover photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MarsPhoto {
    pub id: u64,
    pub sol: u32,
    pub camera: String,
    pub earth_date: NaiveDate,
    pub img_src: String,
}

/// Mars rover photos for a single day or sol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MarsPhotosResult {
    pub rover: Rover,
    pub earth_date: Option<NaiveDate>,
    pub sol: Option<u32>,
    /// Photos returned by the API before the per-request cap.
    pub total_photos: usize,
    pub photos: Vec<MarsPhoto>,
}

/// One close approach of a near-Earth object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NearEarthObject {
    pub id: String,
    pub name: String,
    pub diameter_min_km: Option<f64>,
    pub diameter_max_km: Option<f64>,
    pub is_potentially_hazardous: bool,
    pub close_approach_date: Option<NaiveDate>,
    pub miss_distance_km: f64,
    pub relative_velocity_kph: Option<f64>,
}

/// Near Earth Object feed for a date window, sorted by miss distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NeoFeedResult {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Objects reported in the window before the per-request cap.
    pub element_count: u64,
    pub objects: Vec<NearEarthObject>,
}

/// One EPIC full-disc image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EpicImage {
    pub identifier: String,
    pub caption: Option<String>,
    pub image_url: String,
    pub centroid: Option<Coordinates>,
}

/// Earth imagery, either EPIC full-disc images or a Landsat asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum EarthImageryResult {
    Epic {
        date: NaiveDate,
        image_count: usize,
        images: Vec<EpicImage>,
    },
    Landsat {
        date: Option<NaiveDate>,
        coordinates: Coordinates,
        url: Option<String>,
    },
}

/// Structured response from one NASA endpoint for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "endpoint", content = "data", rename_all = "snake_case")]
pub enum ApiResult {
    Apod(ApodResult),
    MarsPhotos(MarsPhotosResult),
    NeoFeed(NeoFeedResult),
    EarthImagery(EarthImageryResult),
}

impl ApiResult {
    #[must_use]
    pub const fn kind(&self) -> IntentKind {
        match self {
            Self::Apod(_) => IntentKind::Apod,
            Self::MarsPhotos(_) => IntentKind::MarsRover,
            Self::NeoFeed(_) => IntentKind::Neo,
            Self::EarthImagery(_) => IntentKind::EarthImagery,
        }
    }

    /// Whether the result carries nothing worth showing.
    ///
    /// An empty result never counts as NASA data in a response.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Apod(apod) => apod.title.trim().is_empty(),
            Self::MarsPhotos(mars) => mars.photos.is_empty(),
            Self::NeoFeed(neo) => neo.objects.is_empty(),
            Self::EarthImagery(EarthImageryResult::Epic { images, .. }) => images.is_empty(),
            Self::EarthImagery(EarthImageryResult::Landsat { url, .. }) => url.is_none(),
        }
    }
}
