//! The `nasa_api` function-tool interface.
//!
//! A [`ToolRequest`] is what a model (or the `skywatch fetch` command) sends
//! to address one endpoint directly, bypassing the keyword classifier.

use chrono::NaiveDate;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};

use crate::endpoint::NasaEndpoint;
use crate::errors::CoreError;
use crate::intent::{ApodParams, Coordinates, EarthParams, Intent, MarsParams, NeoParams, Rover};

/// Tool name advertised to the model.
pub const TOOL_NAME: &str = "nasa_api";

/// Arguments of a `nasa_api` tool call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolRequest {
    /// NASA API endpoint to query: `apod` for Astronomy Picture of the Day,
    /// `mars_photos` for Mars rover photos, `neo` for Near-Earth Objects and
    /// `earth` for Earth imagery.
    pub endpoint: String,
    /// Date for the query in YYYY-MM-DD format, defaults to today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Mars rover to get photos from (for `mars_photos`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rover: Option<Rover>,
    /// Martian sol for rover photos (for `mars_photos`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sol: Option<u32>,
    /// Camera name for Mars rover photos (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    /// Number of items to return (for `neo`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Latitude for Earth imagery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Longitude for Earth imagery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

impl ToolRequest {
    /// Convert the tool arguments into a typed intent.
    ///
    /// `neo_window_days` sets the NEO end date relative to the start date.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] for unknown endpoints, malformed dates, or
    /// coordinates that are incomplete or out of range.
    pub fn into_intent(self, neo_window_days: u64) -> Result<Intent, CoreError> {
        let endpoint: NasaEndpoint = self.endpoint.parse()?;
        let date = self.date.as_deref().map(parse_date).transpose()?;

        let intent = match endpoint {
            NasaEndpoint::Apod => Intent::Apod(ApodParams { date }),
            NasaEndpoint::MarsPhotos => Intent::MarsRover(MarsParams {
                rover: self.rover.unwrap_or_default(),
                earth_date: date,
                sol: self.sol,
                camera: self.camera,
            }),
            NasaEndpoint::Neo => {
                let mut params = date.map_or_else(NeoParams::default, |start| {
                    NeoParams::window(start, neo_window_days)
                });
                params.count = self.count;
                Intent::Neo(params)
            }
            NasaEndpoint::Earth => {
                let coordinates = match (self.lat, self.lon) {
                    (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)?),
                    (None, None) => None,
                    _ => {
                        return Err(CoreError::InvalidParameter {
                            field: "lat/lon".into(),
                            reason: "both latitude and longitude are required".into(),
                        });
                    }
                };
                Intent::EarthImagery(EarthParams { date, coordinates })
            }
        };
        Ok(intent)
    }
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`CoreError::InvalidParameter`] if the string is not a valid date.
pub fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| CoreError::InvalidParameter {
        field: "date".into(),
        reason: format!("'{value}' is not a YYYY-MM-DD date: {e}"),
    })
}

/// Function-tool definition in the OpenAI tools format.
#[must_use]
pub fn tool_definition() -> serde_json::Value {
    let mut parameters = serde_json::to_value(schema_for!(ToolRequest)).unwrap_or_default();
    if let Some(map) = parameters.as_object_mut() {
        map.remove("$schema");
        map.remove("title");
        if let Some(endpoint) = map
            .get_mut("properties")
            .and_then(|p| p.get_mut("endpoint"))
            .and_then(serde_json::Value::as_object_mut)
        {
            let names = NasaEndpoint::ALL.iter().map(|e| e.as_str()).collect::<Vec<_>>();
            endpoint.insert("enum".into(), serde_json::json!(names));
        }
    }

    serde_json::json!({
        "type": "function",
        "function": {
            "name": TOOL_NAME,
            "description": "Access NASA data including astronomy picture of the day, \
                            Mars rover photos, near-Earth objects and Earth imagery",
            "parameters": parameters,
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mars_request_defaults_to_curiosity() {
        let request = ToolRequest {
            endpoint: "mars rover".into(),
            date: Some("2023-06-01".into()),
            camera: Some("NAVCAM".into()),
            ..Default::default()
        };
        let intent = request.into_intent(7).unwrap();
        assert_eq!(
            intent,
            Intent::MarsRover(MarsParams {
                rover: Rover::Curiosity,
                earth_date: NaiveDate::from_ymd_opt(2023, 6, 1),
                sol: None,
                camera: Some("NAVCAM".into()),
            })
        );
    }

    #[test]
    fn neo_request_builds_window() {
        let request = ToolRequest {
            endpoint: "neo".into(),
            date: Some("2024-01-01".into()),
            count: Some(3),
            ..Default::default()
        };
        let Intent::Neo(params) = request.into_intent(7).unwrap() else {
            panic!("expected neo intent");
        };
        assert_eq!(params.end_date, NaiveDate::from_ymd_opt(2024, 1, 8));
        assert_eq!(params.count, Some(3));
    }

    #[test]
    fn bad_date_is_rejected() {
        let request = ToolRequest {
            endpoint: "apod".into(),
            date: Some("2022-13-40".into()),
            ..Default::default()
        };
        assert!(matches!(
            request.into_intent(7),
            Err(CoreError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn half_coordinates_are_rejected() {
        let request = ToolRequest {
            endpoint: "earth".into(),
            lat: Some(40.7),
            ..Default::default()
        };
        assert!(request.into_intent(7).is_err());
    }

    #[test]
    fn tool_definition_lists_endpoints() {
        let definition = tool_definition();
        assert_eq!(definition["function"]["name"], TOOL_NAME);
        let endpoints = &definition["function"]["parameters"]["properties"]["endpoint"]["enum"];
        assert_eq!(endpoints, &serde_json::json!(["apod", "mars_photos", "neo", "earth"]));
        let required = &definition["function"]["parameters"]["required"];
        assert_eq!(required, &serde_json::json!(["endpoint"]));
    }
}
