//! Earth imagery clients: EPIC full-disc images and Landsat assets.

use chrono::NaiveDate;
use sky_core::intent::{Coordinates, EarthParams};
use sky_core::result::{EarthImageryResult, EpicImage};

use crate::{NasaClient, error::FetchError, parse_nasa_date, today};

/// Public archive that serves EPIC images without an API key.
const EPIC_ARCHIVE: &str = "https://epic.gsfc.nasa.gov/archive/natural";

/// Width and height of the Landsat tile, in degrees.
const LANDSAT_DIM: &str = "0.15";

#[derive(serde::Deserialize)]
struct EpicEntry {
    identifier: String,
    caption: Option<String>,
    image: String,
    date: String,
    centroid_coordinates: Option<Centroid>,
}

#[derive(serde::Deserialize)]
struct Centroid {
    lat: f64,
    lon: f64,
}

#[derive(serde::Deserialize)]
struct AssetResponse {
    date: Option<String>,
    url: Option<String>,
}

impl NasaClient {
    /// Fetch Earth imagery.
    ///
    /// With coordinates the Landsat asset for that spot is looked up.
    /// Otherwise EPIC full-disc images are returned: for `params.date` when
    /// given and available, else the most recent set.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, the endpoint returns a
    /// non-success status, or the body does not have the expected shape.
    pub async fn fetch_earth_imagery(
        &self,
        params: &EarthParams,
    ) -> Result<EarthImageryResult, FetchError> {
        if let Some(coordinates) = params.coordinates {
            return self.fetch_landsat(coordinates, params.date).await;
        }

        if let Some(date) = params.date {
            let path = format!("/EPIC/api/natural/date/{}", date.format("%Y-%m-%d"));
            let body = self.get_body(&path, &[]).await?;
            let result = parse_epic(&body, date, self.config.epic_image_limit)?;
            if !matches!(&result, EarthImageryResult::Epic { images, .. } if images.is_empty()) {
                return Ok(result);
            }
            tracing::debug!(%date, "no EPIC images for date; using the latest set");
        }

        let body = self.get_body("/EPIC/api/natural", &[]).await?;
        parse_epic(&body, params.date.unwrap_or_else(today), self.config.epic_image_limit)
    }

    async fn fetch_landsat(
        &self,
        coordinates: Coordinates,
        date: Option<NaiveDate>,
    ) -> Result<EarthImageryResult, FetchError> {
        let date = date.unwrap_or_else(today);
        let query = [
            ("lat", coordinates.lat.to_string()),
            ("lon", coordinates.lon.to_string()),
            ("date", date.format("%Y-%m-%d").to_string()),
            ("dim", LANDSAT_DIM.to_string()),
        ];
        let body = self.get_body("/planetary/earth/assets", &query).await?;
        parse_asset(&body, coordinates)
    }
}

/// Build the archive URL of an EPIC image from its capture timestamp.
pub fn epic_image_url(date: NaiveDate, image: &str) -> String {
    format!("{EPIC_ARCHIVE}/{}/png/{image}.png", date.format("%Y/%m/%d"))
}

/// Validate an EPIC listing and keep the first `limit` images.
///
/// `fallback_date` is reported when the listing is empty.
pub(crate) fn parse_epic(
    body: &str,
    fallback_date: NaiveDate,
    limit: usize,
) -> Result<EarthImageryResult, FetchError> {
    let entries: Vec<EpicEntry> = serde_json::from_str(body)?;
    let image_count = entries.len();

    let mut date = None;
    let mut images = Vec::with_capacity(limit.min(image_count));
    for entry in entries.into_iter().take(limit) {
        let captured = parse_nasa_date("epic.date", &entry.date)?;
        date.get_or_insert(captured);
        images.push(EpicImage {
            image_url: epic_image_url(captured, &entry.image),
            identifier: entry.identifier,
            caption: entry.caption,
            centroid: entry
                .centroid_coordinates
                .and_then(|c| Coordinates::new(c.lat, c.lon).ok()),
        });
    }

    Ok(EarthImageryResult::Epic {
        date: date.unwrap_or(fallback_date),
        image_count,
        images,
    })
}

/// Validate a Landsat asset body.
pub(crate) fn parse_asset(
    body: &str,
    coordinates: Coordinates,
) -> Result<EarthImageryResult, FetchError> {
    let data: AssetResponse = serde_json::from_str(body)?;
    Ok(EarthImageryResult::Landsat {
        date: data
            .date
            .map(|d| parse_nasa_date("earth.date", &d))
            .transpose()?,
        coordinates,
        url: data.url.filter(|u| !u.trim().is_empty()),
    })
}
