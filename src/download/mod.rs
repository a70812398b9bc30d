//! Content download: HTTP transport, retry policy, batch engine, extraction.
//!
//! This module fetches map archives, cover images and audio previews, and
//! unpacks archives into per-map folders.
//!
//! # Features
//!
//! - Pluggable [`Transport`] with a reqwest-backed [`HttpClient`]
//! - Bounded-concurrency batch downloads with progress reporting
//! - Per-failure retry classification with a fixed backoff
//! - Folder-name sanitization and zip extraction
//!
//! # Example
//!
//! ```no_run
//! use beatsaver_core::download::HttpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let cover = client.get_bytes("https://cdn.beatsaver.com/abc.jpg").await?;
//! println!("cover is {} bytes", cover.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod extract;
mod retry;
mod transport;

pub use client::HttpClient;
pub use constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS, RETRY_BACKOFF};
pub use engine::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadItem, DownloadStats, ProgressFn, WorkItem,
};
pub use error::{DownloadError, ExtractError};
pub use extract::{compute_destination, extract_all, replace_illegal_chars_in_path};
pub use retry::{DEFAULT_MAX_RETRIES, FailureType, RetryDecision, RetryPolicy, classify_error};
pub use transport::{TransferProgressFn, Transport};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
