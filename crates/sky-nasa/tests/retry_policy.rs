//! Retry and fallback behavior against a scripted local HTTP server.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sky_config::NasaConfig;
use sky_core::intent::{ApodParams, EarthParams};
use sky_core::result::EarthImageryResult;
use sky_nasa::{FetchError, NasaClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const APOD_BODY: &str = r#"{"title":"Christmas Tree Cluster","date":"2022-12-25","url":"https://apod.nasa.gov/apod/image/2212/tree.jpg","media_type":"image"}"#;

const EPIC_BODY: &str = r#"[{
    "identifier": "20240501003633",
    "caption": "This image was taken by NASA's EPIC camera",
    "image": "epic_1b_20240501003633",
    "date": "2024-05-01 00:31:45",
    "centroid_coordinates": {"lat": 9.5, "lon": 168.2}
}]"#;

struct Scripted {
    status: u16,
    headers: &'static str,
    body: &'static str,
}

const fn reply(status: u16, body: &'static str) -> Scripted {
    Scripted {
        status,
        headers: "",
        body,
    }
}

/// Serve `script` in order, one connection per request, and record each
/// request target. Requests past the end of the script get a 500.
async fn serve(script: Vec<Scripted>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let recorded = seen.clone();
    let mut script = VecDeque::from(script);
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let mut buf = vec![0u8; 8192];
            let n = stream.read(&mut buf).await.unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]);
            let target = request
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(1))
                .unwrap_or_default()
                .to_string();
            recorded.lock().unwrap().push(target);

            let next = script.pop_front().unwrap_or(reply(500, "{}"));
            let response = format!(
                "HTTP/1.1 {} Scripted\r\nContent-Type: application/json\r\nConnection: close\r\n{}Content-Length: {}\r\n\r\n{}",
                next.status,
                next.headers,
                next.body.len(),
                next.body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    (format!("http://127.0.0.1:{port}"), seen)
}

fn client(base_url: String) -> NasaClient {
    NasaClient::new(NasaConfig {
        base_url,
        max_retries: 2,
        backoff_ms: 1,
        max_backoff_ms: 10,
        ..Default::default()
    })
    .unwrap()
}

fn requests(seen: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    seen.lock().unwrap().clone()
}

#[tokio::test]
async fn server_error_is_retried_until_success() {
    let (base_url, seen) = serve(vec![
        reply(503, r#"{"msg":"unavailable"}"#),
        reply(200, APOD_BODY),
    ])
    .await;

    let apod = client(base_url)
        .fetch_apod(&ApodParams::default())
        .await
        .unwrap();

    assert_eq!(apod.title, "Christmas Tree Cluster");
    assert_eq!(requests(&seen).len(), 2);
}

#[tokio::test]
async fn retries_stop_after_max_retries() {
    let (base_url, seen) = serve(vec![
        reply(503, "{}"),
        reply(503, "{}"),
        reply(503, "{}"),
        reply(200, APOD_BODY),
    ])
    .await;

    let error = client(base_url)
        .fetch_apod(&ApodParams::default())
        .await
        .unwrap_err();

    assert!(matches!(error, FetchError::Api { status: 503, .. }));
    assert_eq!(requests(&seen).len(), 3);
}

#[tokio::test]
async fn not_found_is_terminal() {
    let (base_url, seen) = serve(vec![reply(404, "{}"), reply(200, APOD_BODY)]).await;

    let error = client(base_url)
        .fetch_apod(&ApodParams::default())
        .await
        .unwrap_err();

    assert!(matches!(error, FetchError::NotFound(_)));
    assert_eq!(requests(&seen).len(), 1);
}

#[tokio::test]
async fn invalid_body_is_terminal() {
    let (base_url, seen) = serve(vec![
        reply(200, r#"{"date":"2022-12-25"}"#),
        reply(200, APOD_BODY),
    ])
    .await;

    let error = client(base_url)
        .fetch_apod(&ApodParams::default())
        .await
        .unwrap_err();

    assert!(matches!(error, FetchError::InvalidResponse(_)));
    assert_eq!(requests(&seen).len(), 1);
}

#[tokio::test]
async fn retry_after_beyond_backoff_cap_gives_up() {
    let (base_url, seen) = serve(vec![
        Scripted {
            status: 429,
            headers: "Retry-After: 120\r\n",
            body: "{}",
        },
        reply(200, APOD_BODY),
    ])
    .await;

    let error = client(base_url)
        .fetch_apod(&ApodParams::default())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        FetchError::RateLimited {
            retry_after_secs: 120,
        }
    ));
    assert_eq!(requests(&seen).len(), 1);
}

#[tokio::test]
async fn empty_epic_date_falls_back_to_latest_set() {
    let (base_url, seen) = serve(vec![reply(200, "[]"), reply(200, EPIC_BODY)]).await;
    let params = EarthParams {
        date: NaiveDate::from_ymd_opt(2024, 5, 3),
        coordinates: None,
    };

    let result = client(base_url)
        .fetch_earth_imagery(&params)
        .await
        .unwrap();

    let EarthImageryResult::Epic {
        date,
        image_count,
        images,
    } = result
    else {
        panic!("expected EPIC imagery");
    };
    assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    assert_eq!(image_count, 1);
    assert_eq!(images.len(), 1);

    let targets = requests(&seen);
    assert_eq!(targets.len(), 2);
    assert!(targets[0].starts_with("/EPIC/api/natural/date/2024-05-03?"));
    assert!(targets[1].starts_with("/EPIC/api/natural?"));
}
