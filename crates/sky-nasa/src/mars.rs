//! Mars Rover Photos client.

use sky_core::intent::{MarsParams, Rover};
use sky_core::result::{MarsPhoto, MarsPhotosResult};

use crate::{NasaClient, error::FetchError, parse_nasa_date};

#[derive(serde::Deserialize)]
struct PhotosResponse {
    #[serde(alias = "latest_photos")]
    photos: Vec<PhotoEntry>,
}

#[derive(serde::Deserialize)]
struct PhotoEntry {
    id: u64,
    sol: u32,
    camera: CameraEntry,
    img_src: String,
    earth_date: String,
}

#[derive(serde::Deserialize)]
struct CameraEntry {
    name: String,
    full_name: Option<String>,
}

impl NasaClient {
    /// Fetch photos taken by `params.rover`.
    ///
    /// `sol` wins over `earth_date`; with neither, the rover's most recent
    /// photo day is requested. At most `photo_limit` photos are kept.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, the endpoint returns a
    /// non-success status, or the body does not have the expected shape.
    pub async fn fetch_mars_photos(
        &self,
        params: &MarsParams,
    ) -> Result<MarsPhotosResult, FetchError> {
        let rover = params.rover.as_str();
        let mut query = Vec::new();
        let path = if let Some(sol) = params.sol {
            query.push(("sol", sol.to_string()));
            format!("/mars-photos/api/v1/rovers/{rover}/photos")
        } else if let Some(date) = params.earth_date {
            query.push(("earth_date", date.format("%Y-%m-%d").to_string()));
            format!("/mars-photos/api/v1/rovers/{rover}/photos")
        } else {
            format!("/mars-photos/api/v1/rovers/{rover}/latest_photos")
        };
        if let Some(camera) = &params.camera {
            query.push(("camera", camera.to_ascii_lowercase()));
        }

        let body = self.get_body(&path, &query).await?;
        let mut result = parse_photos(&body, params.rover, self.config.photo_limit)?;
        if params.sol.is_some() {
            result.sol = params.sol;
        } else if params.earth_date.is_some() {
            result.earth_date = params.earth_date;
        }
        Ok(result)
    }
}

/// Validate a photos body and keep the first `limit` photos.
///
/// The day of the result is taken from the first photo, which is what the
/// `latest_photos` endpoint resolves to.
pub(crate) fn parse_photos(
    body: &str,
    rover: Rover,
    limit: usize,
) -> Result<MarsPhotosResult, FetchError> {
    let data: PhotosResponse = serde_json::from_str(body)?;
    let total_photos = data.photos.len();

    let photos = data
        .photos
        .into_iter()
        .take(limit)
        .map(|entry| {
            Ok(MarsPhoto {
                id: entry.id,
                sol: entry.sol,
                camera: entry
                    .camera
                    .full_name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or(entry.camera.name),
                earth_date: parse_nasa_date("mars.earth_date", &entry.earth_date)?,
                img_src: entry.img_src,
            })
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    Ok(MarsPhotosResult {
        rover,
        earth_date: photos.first().map(|p| p.earth_date),
        sol: photos.first().map(|p| p.sol),
        total_photos,
        photos,
    })
}
