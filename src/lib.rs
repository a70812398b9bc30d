//! BeatSaver Core Library
//!
//! Typed access to the BeatSaver map-sharing service: REST lookups and
//! searches, and batch download of map archives into a game's custom levels
//! folder.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`mapping`] - Declarative JSON to record mapping (`record!`, [`Record`])
//! - [`models`] - Typed records for the service's payloads
//! - [`download`] - Transport, retry policy, archive extraction, batch engine
//! - [`api`] - [`BeatSaverClient`], query options, callback variants
//! - [`config`] - [`ClientConfig`] endpoints and knobs
//!
//! A batch download fans out over a bounded set of tokio tasks. Each task
//! fetches one archive (retrying only body-level failures), extracts it on the
//! blocking pool, and records its outcome in a shared keyed table. Individual
//! failures never fail the batch; they show up as `None` entries.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod config;
pub mod download;
pub mod mapping;
pub mod models;
mod user_agent;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use api::{
    ApiError, BeatSaverClient, Filter, LatestQueryOptions, SearchQueryOptions, SearchSortOrder,
    Timestamp, spawn_with_callback,
};
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_CDN_URL, DEFAULT_OUTPUT_ROOT};
pub use download::{
    DEFAULT_CONCURRENCY, DEFAULT_MAX_RETRIES, DownloadEngine, DownloadError, DownloadItem,
    DownloadStats, ExtractError, FailureType, HttpClient, ProgressFn, RetryDecision, RetryPolicy,
    TransferProgressFn, Transport, classify_error,
};
pub use mapping::{DecodeError, Record};
pub use models::{Beatmap, BeatmapVersion, Page, SearchPage, UserDetail};
