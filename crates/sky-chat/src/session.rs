//! One query in, one [`Response`] out.

use std::fmt;
use std::time::Duration;

use futures::future::join_all;
use sky_config::SkywatchConfig;
use sky_core::intent::Intent;
use sky_core::response::Response;
use sky_nasa::FetchError;

use crate::classifier::IntentClassifier;
use crate::composer::{Composer, FetchOutcome};
use crate::source::{DataSource, LanguageModel};

/// Where a session is in handling the current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Classifying,
    /// Waiting on this many concurrent NASA fetches.
    Fetching(usize),
    Composing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Classifying => f.write_str("classifying"),
            Self::Fetching(n) => write!(f, "fetching({n})"),
            Self::Composing => f.write_str("composing"),
        }
    }
}

/// Drives classify → fetch → compose for one query at a time.
///
/// Holds no state between queries apart from the current [`Stage`].
pub struct ChatSession<S, M> {
    classifier: IntentClassifier,
    composer: Composer,
    source: S,
    model: M,
    fetch_deadline: Duration,
    stage: Stage,
}

impl<S: DataSource, M: LanguageModel> ChatSession<S, M> {
    pub fn new(config: &SkywatchConfig, source: S, model: M) -> Self {
        Self {
            classifier: IntentClassifier::new(config.nasa.neo_window_days),
            composer: Composer::new(&config.chat, config.llm.system_prompt.clone()),
            source,
            model,
            fetch_deadline: Duration::from_secs(config.chat.fetch_deadline_secs),
            stage: Stage::Idle,
        }
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub const fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// Answer `query`. Never fails: fetch and model failures degrade the answer.
    pub async fn handle(&mut self, query: &str) -> Response {
        self.enter(Stage::Classifying);
        let intents = self.classifier.classify(query);
        self.handle_intents(query, &intents).await
    }

    /// Answer `query` with an already classified intent list.
    pub async fn handle_intents(&mut self, query: &str, intents: &[Intent]) -> Response {
        self.enter(Stage::Fetching(intents.len()));
        let outcomes = self.fetch_all(intents).await;

        self.enter(Stage::Composing);
        let response = self.composer.compose(query, outcomes, &self.model).await;

        self.enter(Stage::Idle);
        tracing::debug!(
            used_nasa_data = response.used_nasa_data,
            contains_url = response.contains_url,
            degraded = response.degraded.len(),
            "query answered"
        );
        response
    }

    /// Answer `query` from the model alone, bypassing NASA.
    pub async fn baseline(&self, query: &str) -> Option<String> {
        self.composer.answer_without_data(query, &self.model).await
    }

    /// Fetch every intent concurrently, each bounded by the fetch deadline.
    async fn fetch_all(&self, intents: &[Intent]) -> Vec<FetchOutcome> {
        let deadline = self.fetch_deadline;
        join_all(intents.iter().map(|intent| async move {
            let result = match tokio::time::timeout(deadline, self.source.fetch(intent)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Network(format!(
                    "no answer within {}s",
                    deadline.as_secs()
                ))),
            };
            FetchOutcome {
                kind: intent.kind(),
                result,
            }
        }))
        .await
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!(from = %self.stage, to = %stage, "stage");
        self.stage = stage;
    }
}
