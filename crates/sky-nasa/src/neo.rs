//! Near Earth Object feed client.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use sky_core::intent::NeoParams;
use sky_core::result::{NearEarthObject, NeoFeedResult};

use crate::{NasaClient, error::FetchError, parse_nasa_date, today};

/// Longest window the feed endpoint accepts, in days.
pub const MAX_WINDOW_DAYS: u64 = 7;

#[derive(serde::Deserialize)]
struct FeedResponse {
    #[serde(default)]
    element_count: u64,
    near_earth_objects: BTreeMap<String, Vec<NeoEntry>>,
}

#[derive(serde::Deserialize)]
struct NeoEntry {
    id: String,
    name: String,
    #[serde(default)]
    is_potentially_hazardous_asteroid: bool,
    estimated_diameter: Option<EstimatedDiameter>,
    #[serde(default)]
    close_approach_data: Vec<CloseApproach>,
}

#[derive(serde::Deserialize)]
struct EstimatedDiameter {
    kilometers: Option<DiameterRange>,
}

#[derive(serde::Deserialize)]
struct DiameterRange {
    estimated_diameter_min: Option<f64>,
    estimated_diameter_max: Option<f64>,
}

#[derive(serde::Deserialize)]
struct CloseApproach {
    close_approach_date: Option<String>,
    relative_velocity: Option<Velocity>,
    miss_distance: Option<MissDistance>,
}

#[derive(serde::Deserialize)]
struct Velocity {
    kilometers_per_hour: Option<String>,
}

#[derive(serde::Deserialize)]
struct MissDistance {
    kilometers: Option<String>,
}

/// Resolve the requested window: start defaults to today, end to
/// `start + default_days`, and the span is clamped to [`MAX_WINDOW_DAYS`].
#[must_use]
pub fn resolve_window(params: &NeoParams, default_days: u64) -> (NaiveDate, NaiveDate) {
    let start = params.start_date.unwrap_or_else(today);
    let latest = start.checked_add_days(Days::new(MAX_WINDOW_DAYS)).unwrap_or(start);
    let end = params
        .end_date
        .or_else(|| start.checked_add_days(Days::new(default_days.min(MAX_WINDOW_DAYS))))
        .unwrap_or(start);

    if end < start {
        tracing::debug!(%start, %end, "NEO window ends before it starts; using a single day");
        (start, start)
    } else if end > latest {
        tracing::debug!(%start, %end, %latest, "NEO window too long; clamping");
        (start, latest)
    } else {
        (start, end)
    }
}

impl NasaClient {
    /// Fetch close approaches in the requested window, closest first.
    ///
    /// Keeps `params.count` objects, or `neo_count` from the config.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, the endpoint returns a
    /// non-success status, or the body does not have the expected shape.
    pub async fn fetch_neo_feed(&self, params: &NeoParams) -> Result<NeoFeedResult, FetchError> {
        let (start, end) = resolve_window(params, self.config.neo_window_days);
        let query = [
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
        ];
        let body = self.get_body("/neo/rest/v1/feed", &query).await?;
        parse_feed(&body, start, end, params.count.unwrap_or(self.config.neo_count))
    }
}

/// Flatten the per-day feed, sort by miss distance and keep `count` objects.
///
/// Objects without a parseable miss distance cannot be ranked and are skipped.
pub(crate) fn parse_feed(
    body: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    count: usize,
) -> Result<NeoFeedResult, FetchError> {
    let data: FeedResponse = serde_json::from_str(body)?;

    let mut objects = Vec::new();
    for entry in data.near_earth_objects.into_values().flatten() {
        let Some(approach) = entry.close_approach_data.into_iter().next() else {
            tracing::debug!(id = %entry.id, "NEO without close approach data; skipping");
            continue;
        };
        let Some(miss_distance_km) = approach
            .miss_distance
            .and_then(|m| m.kilometers)
            .and_then(|km| km.parse::<f64>().ok())
        else {
            tracing::debug!(id = %entry.id, "NEO without miss distance; skipping");
            continue;
        };

        let diameter = entry.estimated_diameter.and_then(|d| d.kilometers);
        objects.push(NearEarthObject {
            id: entry.id,
            name: entry.name,
            diameter_min_km: diameter.as_ref().and_then(|d| d.estimated_diameter_min),
            diameter_max_km: diameter.as_ref().and_then(|d| d.estimated_diameter_max),
            is_potentially_hazardous: entry.is_potentially_hazardous_asteroid,
            close_approach_date: approach
                .close_approach_date
                .and_then(|d| parse_nasa_date("neo.close_approach_date", &d).ok()),
            miss_distance_km,
            relative_velocity_kph: approach
                .relative_velocity
                .and_then(|v| v.kilometers_per_hour)
                .and_then(|v| v.parse::<f64>().ok()),
        });
    }

    objects.sort_by(|a, b| a.miss_distance_km.total_cmp(&b.miss_distance_km));
    objects.truncate(count);

    Ok(NeoFeedResult {
        start_date,
        end_date,
        element_count: data.element_count,
        objects,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const FIXTURE: &str = r#"{
        "links": {"self": "http://api.nasa.gov/neo/rest/v1/feed?start_date=2024-05-01&end_date=2024-05-02"},
        "element_count": 4,
        "near_earth_objects": {
            "2024-05-02": [
                {
                    "id": "3542519",
                    "name": "(2010 PK9)",
                    "estimated_diameter": {"kilometers": {"estimated_diameter_min": 0.1166, "estimated_diameter_max": 0.2608}},
                    "is_potentially_hazardous_asteroid": true,
                    "close_approach_data": [{
                        "close_approach_date": "2024-05-02",
                        "relative_velocity": {"kilometers_per_hour": "106520.4"},
                        "miss_distance": {"kilometers": "1854000.12"}
                    }]
                },
                {
                    "id": "54000001",
                    "name": "(2024 AA)",
                    "is_potentially_hazardous_asteroid": false,
                    "close_approach_data": []
                }
            ],
            "2024-05-01": [
                {
                    "id": "2465633",
                    "name": "465633 (2009 JR5)",
                    "estimated_diameter": {"kilometers": {"estimated_diameter_min": 0.2658, "estimated_diameter_max": 0.5943}},
                    "is_potentially_hazardous_asteroid": false,
                    "close_approach_data": [{
                        "close_approach_date": "2024-05-01",
                        "relative_velocity": {"kilometers_per_hour": "65260.7"},
                        "miss_distance": {"kilometers": "45290298.2"}
                    }]
                },
                {
                    "id": "3726710",
                    "name": "(2015 RC)",
                    "is_potentially_hazardous_asteroid": false,
                    "close_approach_data": [{
                        "close_approach_date": "2024-05-01",
                        "miss_distance": {"kilometers": "391011.5"}
                    }]
                }
            ]
        }
    }"#;

    #[test]
    fn feed_is_sorted_by_miss_distance() {
        let result = parse_feed(FIXTURE, date(2024, 5, 1), date(2024, 5, 2), 5).unwrap();
        let names: Vec<&str> = result.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["(2015 RC)", "(2010 PK9)", "465633 (2009 JR5)"]);
        assert_eq!(result.element_count, 4);
    }

    #[test]
    fn objects_without_miss_distance_are_skipped() {
        let result = parse_feed(FIXTURE, date(2024, 5, 1), date(2024, 5, 2), 10).unwrap();
        assert!(result.objects.iter().all(|o| o.id != "54000001"));
    }

    #[test]
    fn optional_fields_stay_absent() {
        let result = parse_feed(FIXTURE, date(2024, 5, 1), date(2024, 5, 2), 1).unwrap();
        let closest = &result.objects[0];
        assert_eq!(closest.id, "3726710");
        assert!(closest.diameter_min_km.is_none());
        assert!(closest.relative_velocity_kph.is_none());
        assert_eq!(closest.close_approach_date, Some(date(2024, 5, 1)));
    }

    #[test]
    fn hazardous_flag_and_diameter_carry_through() {
        let result = parse_feed(FIXTURE, date(2024, 5, 1), date(2024, 5, 2), 2).unwrap();
        let pk9 = &result.objects[1];
        assert!(pk9.is_potentially_hazardous);
        assert_eq!(pk9.diameter_max_km, Some(0.2608));
        assert_eq!(pk9.relative_velocity_kph, Some(106_520.4));
    }

    #[test]
    fn count_truncates() {
        let result = parse_feed(FIXTURE, date(2024, 5, 1), date(2024, 5, 2), 2).unwrap();
        assert_eq!(result.objects.len(), 2);
    }

    #[test]
    fn window_defaults_and_clamps() {
        let start = date(2024, 5, 1);
        let open = NeoParams {
            start_date: Some(start),
            ..Default::default()
        };
        assert_eq!(resolve_window(&open, 7), (start, date(2024, 5, 8)));
        assert_eq!(resolve_window(&open, 3), (start, date(2024, 5, 4)));

        let long = NeoParams {
            start_date: Some(start),
            end_date: Some(date(2024, 6, 1)),
            count: None,
        };
        assert_eq!(resolve_window(&long, 7), (start, date(2024, 5, 8)));

        let backwards = NeoParams {
            start_date: Some(start),
            end_date: Some(date(2024, 4, 1)),
            count: None,
        };
        assert_eq!(resolve_window(&backwards, 7), (start, start));
    }

    #[test]
    fn missing_feed_is_invalid() {
        assert!(matches!(
            parse_feed(r#"{"element_count": 0}"#, date(2024, 5, 1), date(2024, 5, 2), 5),
            Err(FetchError::InvalidResponse(_))
        ));
    }
}
