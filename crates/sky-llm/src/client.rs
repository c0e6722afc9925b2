//! OpenAI-compatible chat completion client (`/v1/chat/completions`).
//!
//! All wire types are private to this module. The client is stateless: one
//! call is one round-trip, with no history and no tool-call loop.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sky_config::LlmConfig;
use tracing::{debug, trace, warn};

use crate::error::LlmError;

/// Hard timeout of the reachability check, independent of the model timeout.
const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for any endpoint implementing `/v1/chat/completions`.
///
/// Covers Ollama, LM Studio and hosted OpenAI-compatible services. Cheap to
/// clone.
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: Client,
    url: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
}

impl LlmClient {
    /// Build a client from the `llm` config section.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Network`] if the HTTP client fails to build.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key: config.api_key().map(str::to_string),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check that the endpoint answers at all.
    ///
    /// Any HTTP response, 4xx included, counts as reachable. Only a transport
    /// failure is an error.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Network`] when the endpoint cannot be reached
    /// within five seconds.
    pub async fn ping(&self) -> Result<(), LlmError> {
        let mut req = self.client.head(&self.url).timeout(PING_TIMEOUT);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        req.send()
            .await
            .map(|_| ())
            .map_err(|e| LlmError::Network(format!("unreachable: {e}")))
    }

    /// Send `content` as the user message, with `system` as the system prompt.
    ///
    /// Returns the trimmed text of the first choice.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] on transport failure, a non-success status, an
    /// unparseable body, or a completion without text.
    pub async fn complete(&self, content: &str, system: Option<&str>) -> Result<String, LlmError> {
        let payload = build_request(&self.model, self.temperature, content, system);

        debug!(
            model = %payload.model,
            temperature = payload.temperature,
            content_len = content.len(),
            "sending completion request"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(payload = %json, "completion request payload");
        }

        let mut req = self.client.post(&self.url).json(&payload);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.map_err(|e| {
            warn!(url = %self.url, error = %e, "completion request failed (transport)");
            LlmError::from(e)
        })?;
        let response = check_status(response).await?;
        let body = response.text().await?;
        parse_completion(&body)
    }
}

// ── Private wire types ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn build_request<'a>(
    model: &'a str,
    temperature: f32,
    content: &'a str,
    system: Option<&'a str>,
) -> ChatCompletionRequest<'a> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system {
        messages.push(Message {
            role: "system",
            content: system,
        });
    }
    messages.push(Message {
        role: "user",
        content,
    });
    ChatCompletionRequest {
        model,
        messages,
        temperature,
        stream: false,
    }
}

fn parse_completion(body: &str) -> Result<String, LlmError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
    debug!(choices = parsed.choices.len(), "received completion");

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(LlmError::EmptyContent)
}

/// Return the response if successful, or a structured error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map_or_else(|_| body.trim().to_string(), |env| env.error.message);

    warn!(%status, %message, "completion request returned HTTP error");
    Err(LlmError::Status {
        status: status.as_u16(),
        message,
    })
}
