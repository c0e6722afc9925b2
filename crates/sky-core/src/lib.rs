//! # sky-core
//!
//! Core types and error types for Skywatch.
//!
//! This crate provides the foundational types shared across all Skywatch crates:
//! - Intent tags and their extracted parameters
//! - Typed NASA API results, one variant per endpoint
//! - Composed responses and their degradation notes
//! - Endpoint aliases and the `nasa_api` tool request
//! - Batch report rows and summaries
//! - Cross-cutting error types

pub mod endpoint;
pub mod errors;
pub mod intent;
pub mod report;
pub mod response;
pub mod result;
pub mod tool;
