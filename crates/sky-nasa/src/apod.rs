//! Astronomy Picture of the Day client.

use sky_core::intent::ApodParams;
use sky_core::result::ApodResult;

use crate::{NasaClient, error::FetchError, parse_nasa_date};

#[derive(serde::Deserialize)]
struct ApodResponse {
    title: Option<String>,
    date: Option<String>,
    explanation: Option<String>,
    url: Option<String>,
    hdurl: Option<String>,
    media_type: Option<String>,
    copyright: Option<String>,
}

impl NasaClient {
    /// Fetch the picture for `params.date`, or today's.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, the endpoint returns a
    /// non-success status (dates before 1995-06-16 are a 400), or the body
    /// lacks a title or date.
    pub async fn fetch_apod(&self, params: &ApodParams) -> Result<ApodResult, FetchError> {
        let mut query = Vec::new();
        if let Some(date) = params.date {
            query.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        let body = self.get_body("/planetary/apod", &query).await?;
        parse_apod(&body)
    }
}

/// Validate an APOD body. Title and date are required; everything else is optional.
pub(crate) fn parse_apod(body: &str) -> Result<ApodResult, FetchError> {
    let data: ApodResponse = serde_json::from_str(body)?;

    let title = data
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FetchError::invalid("apod: missing title"))?;
    let date = data
        .date
        .ok_or_else(|| FetchError::invalid("apod: missing date"))
        .and_then(|d| parse_nasa_date("apod.date", &d))?;

    Ok(ApodResult {
        title,
        date,
        explanation: data.explanation.map(|e| e.trim().to_string()),
        url: data.url,
        hd_url: data.hdurl,
        media_type: data.media_type,
        copyright: data.copyright.map(|c| c.trim().to_string()),
    })
}
