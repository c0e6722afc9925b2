//! # sky-chat
//!
//! The question-answering pipeline of Skywatch:
//!
//! 1. [`IntentClassifier`] maps a query to zero or more NASA intents.
//! 2. [`ChatSession`] fetches every intent concurrently through a
//!    [`DataSource`].
//! 3. [`Composer`] merges the typed results with prose from a
//!    [`LanguageModel`] into one [`Response`](sky_core::response::Response).
//!
//! [`run_report`] drives the fixed query suite through the same pipeline.

pub mod classifier;
pub mod composer;
pub mod report;
pub mod session;
pub mod source;

pub use classifier::IntentClassifier;
pub use composer::{APOLOGY, Composer, FetchOutcome};
pub use report::{render_markdown, run_report};
pub use session::{ChatSession, Stage};
pub use source::{DataSource, LanguageModel};
