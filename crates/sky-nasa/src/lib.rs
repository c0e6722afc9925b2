//! # sky-nasa
//!
//! NASA Open API clients for Skywatch.
//!
//! One operation per endpoint, all on a shared [`NasaClient`]:
//! - Astronomy Picture of the Day (`/planetary/apod`)
//! - Mars Rover Photos (`/mars-photos/api/v1`)
//! - Near Earth Object feed (`/neo/rest/v1/feed`)
//! - Earth imagery: EPIC full-disc (`/EPIC/api/natural`) and Landsat assets
//!   (`/planetary/earth/assets`)
//!
//! Every operation performs one outbound call in the common case, applies the
//! configured timeout and retry policy, and returns a typed result or a
//! [`FetchError`].

pub mod apod;
pub mod earth;
pub mod mars;
pub mod neo;

mod error;
mod http;

pub use error::FetchError;

use chrono::NaiveDate;
use sky_config::NasaConfig;
use sky_core::intent::Intent;
use sky_core::result::ApiResult;

/// HTTP client for the NASA Open APIs.
///
/// Cheap to clone: `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct NasaClient {
    http: reqwest::Client,
    config: NasaConfig,
}

impl NasaClient {
    /// Create a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] if the underlying `reqwest::Client`
    /// fails to build (TLS backend initialization).
    pub fn new(config: NasaConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("skywatch/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub const fn config(&self) -> &NasaConfig {
        &self.config
    }

    /// Fetch the data behind one intent.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails after retries, the endpoint
    /// returns a non-success status, or the response cannot be validated.
    pub async fn fetch(&self, intent: &Intent) -> Result<ApiResult, FetchError> {
        match intent {
            Intent::Apod(params) => self.fetch_apod(params).await.map(ApiResult::Apod),
            Intent::MarsRover(params) => self
                .fetch_mars_photos(params)
                .await
                .map(ApiResult::MarsPhotos),
            Intent::Neo(params) => self.fetch_neo_feed(params).await.map(ApiResult::NeoFeed),
            Intent::EarthImagery(params) => {
                self.fetch_earth_imagery(params).await.map(ApiResult::EarthImagery)
            }
        }
    }
}

/// Today's date in local time; the default for every dated endpoint.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse the leading `YYYY-MM-DD` of a NASA date or timestamp string.
pub(crate) fn parse_nasa_date(field: &str, value: &str) -> Result<NaiveDate, FetchError> {
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .ok_or_else(|| FetchError::invalid(format!("{field}: '{value}' is not a date")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_from_default_config() {
        let client = NasaClient::new(NasaConfig::default()).unwrap();
        assert_eq!(client.config().photo_limit, 5);
    }

    #[test]
    fn parses_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(parse_nasa_date("date", "2024-05-01").ok(), expected);
        assert_eq!(parse_nasa_date("date", "2024-05-01 00:36:33").ok(), expected);
        assert_eq!(parse_nasa_date("date", "2024-05-01T03:30:01.210000").ok(), expected);
        assert!(parse_nasa_date("date", "May 1").is_err());
        assert!(parse_nasa_date("date", "").is_err());
    }

    #[tokio::test]
    #[ignore] // requires network
    async fn live_fetch_every_endpoint() {
        use sky_core::intent::{ApodParams, EarthParams, MarsParams, NeoParams};

        let client = NasaClient::new(NasaConfig::default()).unwrap();
        let intents = [
            Intent::Apod(ApodParams::default()),
            Intent::MarsRover(MarsParams::default()),
            Intent::Neo(NeoParams::default()),
            Intent::EarthImagery(EarthParams::default()),
        ];
        for intent in &intents {
            match client.fetch(intent).await {
                Ok(result) => println!(
                    "── {} ── ok, empty={}",
                    intent.kind(),
                    result.is_empty()
                ),
                Err(e) => println!("── {} ── ERROR: {e}", intent.kind()),
            }
        }
    }
}
