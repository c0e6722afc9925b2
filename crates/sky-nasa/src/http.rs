//! Shared HTTP helpers for the endpoint clients.
//!
//! Centralizes status-code checks (429 with `Retry-After` parsing, 404 →
//! [`FetchError::NotFound`], other non-success → [`FetchError::Api`]) and the
//! bounded retry loop, so endpoint modules stay focused on request
//! construction and response mapping.

use std::time::Duration;

use crate::{NasaClient, error::FetchError};

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status = resp.status();
    if status == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(FetchError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if status == 404 {
        let path = resp.url().path().to_string();
        return Err(FetchError::NotFound(path));
    }
    if !status.is_success() {
        return Err(FetchError::Api {
            status: status.as_u16(),
            message: error_message(&resp.text().await.unwrap_or_default()),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(60)
}

/// Pull `msg` / `error.message` out of an api.nasa.gov error body.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };
    value
        .get("msg")
        .or_else(|| value.get("error").and_then(|e| e.get("message")))
        .and_then(serde_json::Value::as_str)
        .map_or_else(|| body.trim().to_string(), str::to_string)
}

/// Delay before retry number `attempt` (0-based): `base * 2^attempt`, capped.
pub fn backoff_delay(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor).min(max_ms))
}

impl NasaClient {
    /// GET `{base_url}{path}?{query}&api_key=…` and return the body.
    ///
    /// Retries network errors, 5xx and 429 with bounded exponential backoff.
    /// A `Retry-After` longer than the backoff cap ends the retries.
    pub(crate) async fn get_body(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, FetchError> {
        let url = self.url(path, query);
        let mut attempt = 0u32;

        loop {
            tracing::debug!(path, attempt, "NASA request");
            let result = match self.http.get(&url).send().await {
                Ok(resp) => match check_response(resp).await {
                    Ok(resp) => resp.text().await.map_err(FetchError::from),
                    Err(error) => Err(error),
                },
                Err(error) => Err(FetchError::from(error)),
            };

            let error = match result {
                Ok(body) => return Ok(body),
                Err(error) => error,
            };

            if !error.is_retryable() || attempt >= self.config.max_retries {
                return Err(error);
            }

            let delay = match &error {
                FetchError::RateLimited { retry_after_secs } => {
                    let wait = Duration::from_secs(*retry_after_secs);
                    if wait > Duration::from_millis(self.config.max_backoff_ms) {
                        tracing::warn!(
                            path,
                            retry_after_secs,
                            "rate limited beyond backoff cap; giving up"
                        );
                        return Err(error);
                    }
                    wait
                }
                _ => backoff_delay(attempt, self.config.backoff_ms, self.config.max_backoff_ms),
            };

            tracing::warn!(
                path,
                attempt,
                %error,
                delay_ms = delay.as_millis(),
                "retrying NASA request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}{path}?", self.config.base_url.trim_end_matches('/'));
        for (key, value) in query {
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            url.push('&');
        }
        url.push_str("api_key=");
        url.push_str(&urlencoding::encode(&self.config.api_key));
        url
    }
}

#[cfg(test)]
mod tests {
    use sky_config::NasaConfig;

    use super::*;

    fn mock_response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    fn mock_response_with_retry_after(status: u16, value: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .header("Retry-After", value)
                .body(String::new())
                .unwrap(),
        )
    }

    #[test]
    fn parse_retry_after_from_header() {
        let resp = mock_response_with_retry_after(429, "120");
        assert_eq!(parse_retry_after(&resp), 120);
    }

    #[test]
    fn parse_retry_after_missing_or_bad_header() {
        assert_eq!(parse_retry_after(&mock_response(429, "")), 60);
        let resp = mock_response_with_retry_after(429, "Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_retry_after(&resp), 60);
    }

    #[tokio::test]
    async fn check_response_rate_limited() {
        let resp = mock_response_with_retry_after(429, "30");
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::RateLimited {
                retry_after_secs: 30,
            }
        ));
    }

    #[tokio::test]
    async fn check_response_not_found() {
        let err = check_response(mock_response(404, "")).await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(_)));
    }

    #[tokio::test]
    async fn check_response_api_error_extracts_message() {
        let body = r#"{"code":400,"msg":"Date must be between Jun 16, 1995 and Oct 19, 2026.","service_version":"v1"}"#;
        let err = check_response(mock_response(400, body)).await.unwrap_err();
        match err {
            FetchError::Api { status, message } => {
                assert_eq!(status, 400);
                assert!(message.starts_with("Date must be between"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn check_response_nested_error_message() {
        let body = r#"{"error":{"code":"API_KEY_INVALID","message":"An invalid api_key was supplied."}}"#;
        let err = check_response(mock_response(403, body)).await.unwrap_err();
        assert!(matches!(err, FetchError::Api { status: 403, ref message } if message.contains("invalid api_key")));
    }

    #[tokio::test]
    async fn check_response_success() {
        assert!(check_response(mock_response(200, "{}")).await.is_ok());
    }

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(backoff_delay(0, 500, 5_000), Duration::from_millis(500));
        assert_eq!(backoff_delay(1, 500, 5_000), Duration::from_millis(1_000));
        assert_eq!(backoff_delay(3, 500, 5_000), Duration::from_millis(4_000));
        assert_eq!(backoff_delay(4, 500, 5_000), Duration::from_millis(5_000));
        assert_eq!(backoff_delay(80, 500, 5_000), Duration::from_millis(5_000));
    }

    #[test]
    fn url_appends_encoded_query_and_key() {
        let client = NasaClient::new(NasaConfig {
            api_key: "k ey".into(),
            base_url: "https://api.nasa.gov/".into(),
            ..Default::default()
        })
        .unwrap();
        let url = client.url("/planetary/apod", &[("date", "2022-12-25".into())]);
        assert_eq!(url, "https://api.nasa.gov/planetary/apod?date=2022-12-25&api_key=k%20ey");
    }
}
