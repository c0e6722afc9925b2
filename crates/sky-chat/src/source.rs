//! Seams between the chat pipeline and its two external services.
//!
//! [`ChatSession`](crate::ChatSession) only talks to NASA and the language
//! model through these traits, so tests can swap in in-memory fakes.

use std::future::Future;

use sky_core::intent::Intent;
use sky_core::result::ApiResult;
use sky_llm::{LlmClient, LlmError};
use sky_nasa::{FetchError, NasaClient};

/// Something that can answer an [`Intent`] with NASA data.
pub trait DataSource: Send + Sync {
    fn fetch(&self, intent: &Intent) -> impl Future<Output = Result<ApiResult, FetchError>> + Send;
}

/// Something that can turn a prompt into prose.
pub trait LanguageModel: Send + Sync {
    fn complete(
        &self,
        content: &str,
        system: Option<&str>,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;
}

impl DataSource for NasaClient {
    fn fetch(&self, intent: &Intent) -> impl Future<Output = Result<ApiResult, FetchError>> + Send {
        Self::fetch(self, intent)
    }
}

impl LanguageModel for LlmClient {
    fn complete(
        &self,
        content: &str,
        system: Option<&str>,
    ) -> impl Future<Output = Result<String, LlmError>> + Send {
        Self::complete(self, content, system)
    }
}
