//! Serde roundtrip and JsonSchema validation tests for the public types.

use chrono::NaiveDate;
use schemars::schema_for;
use sky_core::intent::*;
use sky_core::report::*;
use sky_core::response::*;
use sky_core::result::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(recovered, val, "serde roundtrip failed for {}", stringify!($ty));

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

roundtrip_and_validate!(
    mars_intent_roundtrip,
    Intent,
    Intent::MarsRover(MarsParams {
        rover: Rover::Perseverance,
        earth_date: Some(date(2023, 6, 1)),
        sol: None,
        camera: Some("NAVCAM_LEFT".into()),
    })
);

roundtrip_and_validate!(
    earth_intent_roundtrip,
    Intent,
    Intent::EarthImagery(EarthParams {
        date: None,
        coordinates: Some(Coordinates {
            lat: 40.71,
            lon: -74.0,
        }),
    })
);

roundtrip_and_validate!(
    neo_result_roundtrip,
    ApiResult,
    ApiResult::NeoFeed(NeoFeedResult {
        start_date: date(2024, 1, 1),
        end_date: date(2024, 1, 8),
        element_count: 112,
        objects: vec![NearEarthObject {
            id: "3542519".into(),
            name: "(2010 PK9)".into(),
            diameter_min_km: Some(0.118),
            diameter_max_km: None,
            is_potentially_hazardous: true,
            close_approach_date: Some(date(2024, 1, 3)),
            miss_distance_km: 4_120_331.5,
            relative_velocity_kph: Some(54_123.2),
        }],
    })
);

roundtrip_and_validate!(
    epic_result_roundtrip,
    ApiResult,
    ApiResult::EarthImagery(EarthImageryResult::Epic {
        date: date(2024, 5, 1),
        image_count: 12,
        images: vec![EpicImage {
            identifier: "20240501003633".into(),
            caption: Some("This image was taken by NASA's EPIC camera".into()),
            image_url: "https://api.nasa.gov/EPIC/archive/natural/2024/05/01/png/epic_1b_20240501003633.png".into(),
            centroid: Some(Coordinates {
                lat: 8.9,
                lon: 170.2,
            }),
        }],
    })
);

roundtrip_and_validate!(
    response_roundtrip,
    Response,
    Response::new(
        "Here is Mars: https://mars.nasa.gov/".into(),
        vec![IntentKind::MarsRover],
        vec![Degradation {
            intent: IntentKind::Apod,
            failure: FailureKind::NetworkError,
        }],
    )
);

roundtrip_and_validate!(
    report_row_roundtrip,
    ReportRow,
    ReportRow {
        id: 10,
        category: "Off-Topic".into(),
        query: "Tell me about black holes".into(),
        intents: vec![],
        classified_as_expected: true,
        used_nasa_data: false,
        contains_url: false,
        degraded: false,
        response_chars: 420,
        baseline_chars: Some(410),
        response: "Black holes are...".into(),
    }
);
