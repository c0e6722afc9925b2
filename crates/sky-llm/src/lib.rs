//! # sky-llm
//!
//! Language model client for Skywatch.
//!
//! Talks to any OpenAI-compatible `/v1/chat/completions` endpoint; a local
//! Ollama server is the default. The model is only used to phrase answers;
//! every NASA fact comes from `sky-nasa`.

mod client;
mod error;

pub use client::LlmClient;
pub use error::LlmError;
