//! Batch download engine: bounded concurrency, per-failure retry, extraction.
//!
//! The engine fetches map archives through a [`Transport`], unpacks each one
//! under its output root, and collects the per-item outcome into a keyed
//! result table.
//!
//! # Overview
//!
//! [`DownloadEngine::download_many`] runs one task per [`DownloadItem`],
//! with at most `concurrency_limit` fetches in flight. Every item ends in the
//! returned table: `Some(path)` when its archive was fetched and extracted,
//! `None` when any step failed. A failing item never aborts the others.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use beatsaver_core::download::{
//!     DownloadEngine, DownloadItem, HttpClient, ProgressFn, RetryPolicy,
//! };
//!
//! # async fn example() {
//! let engine = DownloadEngine::new(
//!     Arc::new(HttpClient::new()),
//!     RetryPolicy::default(),
//!     "./CustomLevels",
//! );
//! let items = vec![DownloadItem::new("1a2b", "https://example.com/1a2b.zip", "1a2b (Song - mapper)")];
//! let progress: ProgressFn = Arc::new(|completed, total| println!("{completed}/{total}"));
//! let results = engine.download_many(items, 4, Some(progress)).await;
//! println!("{results:?}");
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError};

use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info, instrument, warn};

use super::error::{DownloadError, ExtractError};
use super::extract::{compute_destination, extract_all};
use super::retry::{RetryDecision, RetryPolicy, classify_error};
use super::transport::{TransferProgressFn, Transport};

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Progress callback, invoked as `(completed, total)`.
pub type ProgressFn = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// One archive to fetch and unpack, correlated by a caller-chosen key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadItem<K> {
    /// Caller-supplied identity. Duplicate keys overwrite each other's entry.
    pub key: K,
    /// Archive URL.
    pub url: String,
    /// Unsanitized folder name under the output root.
    pub folder_name: String,
}

impl<K> DownloadItem<K> {
    /// Creates a new download item.
    pub fn new(key: K, url: impl Into<String>, folder_name: impl Into<String>) -> Self {
        Self {
            key,
            url: url.into(),
            folder_name: folder_name.into(),
        }
    }
}

/// A unit of work handed to a worker task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItem<K> {
    /// A single map fetched on its own; the caller gets the path back directly.
    SingleMap {
        /// Archive URL.
        url: String,
        /// Unsanitized folder name under the output root.
        folder_name: String,
    },
    /// One entry of a batch; the outcome goes into the batch result table.
    BulkItem(DownloadItem<K>),
}

impl<K> WorkItem<K> {
    /// Returns the archive URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::SingleMap { url, .. } => url,
            Self::BulkItem(item) => &item.url,
        }
    }

    /// Returns the unsanitized folder name.
    #[must_use]
    pub fn folder_name(&self) -> &str {
        match self {
            Self::SingleMap { folder_name, .. } => folder_name,
            Self::BulkItem(item) => &item.folder_name,
        }
    }
}

/// Statistics from a download batch run.
///
/// Uses atomic counters for thread-safe updates from concurrent tasks.
#[derive(Debug, Default)]
pub struct DownloadStats {
    completed: AtomicUsize,
    failed: AtomicUsize,
    retried: AtomicUsize,
}

impl DownloadStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of items that ended with a path.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Returns the number of items that ended without a path.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the number of retry attempts made.
    #[must_use]
    pub fn retried(&self) -> usize {
        self.retried.load(Ordering::SeqCst)
    }

    fn record_outcome(&self, succeeded: bool) {
        if succeeded {
            self.completed.fetch_add(1, Ordering::SeqCst);
        } else {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn increment_retried(&self) {
        self.retried.fetch_add(1, Ordering::SeqCst);
    }
}

/// Mutable batch state; only touched with the batch lock held.
struct BatchState<K> {
    results: HashMap<K, Option<PathBuf>>,
    completed: usize,
}

/// Everything a worker task needs to report into its batch.
struct BatchContext<K> {
    state: Mutex<BatchState<K>>,
    total: usize,
    progress: Option<ProgressFn>,
    stats: DownloadStats,
}

/// Download engine for concurrent archive downloads with retry support.
///
/// # Concurrency Model
///
/// - Each item runs in its own Tokio task
/// - A semaphore permit is acquired before spawning each task
/// - Permits are released automatically when tasks complete (RAII)
/// - The result table and completed counter share one lock, held only for
///   a single table write and the progress call
///
/// # Retry Behavior
///
/// - Transport failures (connection, timeout) are not retried
/// - Non-2xx statuses are not retried
/// - Other failures are retried after a fixed backoff, up to the policy's ceiling
#[derive(Clone)]
pub struct DownloadEngine {
    transport: Arc<dyn Transport>,
    retry_policy: RetryPolicy,
    output_root: PathBuf,
}

impl fmt::Debug for DownloadEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadEngine")
            .field("retry_policy", &self.retry_policy)
            .field("output_root", &self.output_root)
            .finish_non_exhaustive()
    }
}

impl DownloadEngine {
    /// Creates a new download engine writing under `output_root`.
    pub fn new(
        transport: Arc<dyn Transport>,
        retry_policy: RetryPolicy,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        let output_root = output_root.into();
        debug!(
            max_attempts = retry_policy.max_attempts(),
            output_root = %output_root.display(),
            "creating download engine"
        );
        Self {
            transport,
            retry_policy,
            output_root,
        }
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the directory maps are extracted under.
    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Fetches and extracts every item, at most `concurrency_limit` at a time.
    ///
    /// `concurrency_limit` is clamped to at least 1. `progress` is called as
    /// `(completed, total)` after each item and once more after the whole
    /// batch, so an empty batch reports `(0, 0)`.
    ///
    /// Returns one entry per distinct key: the extraction folder on success,
    /// `None` on failure. Items sharing a key overwrite each other.
    #[instrument(skip(self, items, progress), fields(total = items.len()))]
    pub async fn download_many<K>(
        &self,
        items: Vec<DownloadItem<K>>,
        concurrency_limit: usize,
        progress: Option<ProgressFn>,
    ) -> HashMap<K, Option<PathBuf>>
    where
        K: Eq + Hash + fmt::Debug + Send + Sync + 'static,
    {
        let total = items.len();
        let semaphore = Arc::new(Semaphore::new(concurrency_limit.max(1)));
        let batch = Arc::new(BatchContext {
            state: Mutex::new(BatchState {
                results: HashMap::with_capacity(total),
                completed: 0,
            }),
            total,
            progress,
            stats: DownloadStats::new(),
        });
        let mut handles = Vec::with_capacity(total);

        info!("starting batch download");

        for item in items {
            // Acquire semaphore permit (blocks if at concurrency limit)
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                warn!("semaphore closed; remaining items not dispatched");
                break;
            };

            let engine = self.clone();
            let batch = Arc::clone(&batch);

            handles.push(tokio::spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = permit;
                let work = WorkItem::BulkItem(item);
                let destination = engine.execute(&work, &batch.stats, None).await;
                complete(work, destination, Some(batch.as_ref())).await;
            }));
        }

        debug!(
            task_count = handles.len(),
            "waiting for downloads to complete"
        );

        for handle in handles {
            // Ignore JoinError - task panics are logged but don't fail the batch
            if let Err(e) = handle.await {
                warn!(error = %e, "download task panicked");
            }
        }

        let mut state = batch.state.lock().await;
        if let Some(progress) = &batch.progress {
            progress(state.completed, total);
        }

        info!(
            completed = batch.stats.completed(),
            failed = batch.stats.failed(),
            retried = batch.stats.retried(),
            total,
            "batch download complete"
        );

        std::mem::take(&mut state.results)
    }

    /// Fetches and extracts one archive into `output_root/sanitized(folder_name)`.
    ///
    /// `progress` receives the fraction of the archive received. Reports
    /// never decrease, even across retries.
    ///
    /// Returns the extraction folder, or `None` if any step failed.
    #[instrument(skip(self, progress), fields(url = %url))]
    pub async fn download_one(
        &self,
        url: &str,
        folder_name: &str,
        progress: Option<TransferProgressFn>,
    ) -> Option<PathBuf> {
        let work: WorkItem<()> = WorkItem::SingleMap {
            url: url.to_string(),
            folder_name: folder_name.to_string(),
        };
        let stats = DownloadStats::new();
        let progress = progress.map(non_decreasing);
        let destination = self.execute(&work, &stats, progress.as_ref()).await;
        complete(work, destination, None).await
    }

    /// Fetches with retry, then extracts. Failures are logged and become `None`.
    async fn execute<K>(
        &self,
        work: &WorkItem<K>,
        stats: &DownloadStats,
        progress: Option<&TransferProgressFn>,
    ) -> Option<PathBuf> {
        let url = work.url();
        let bytes = match self.fetch_with_retry(url, stats, progress).await {
            Ok(bytes) => bytes,
            Err((e, attempts)) => {
                warn!(url = %url, error = %e, attempts, "download failed after all attempts");
                stats.record_outcome(false);
                return None;
            }
        };

        let destination = compute_destination(&self.output_root, work.folder_name());
        match extract_blocking(bytes, destination).await {
            Ok(path) => {
                info!(url = %url, path = %path.display(), "download completed");
                stats.record_outcome(true);
                Some(path)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "extraction failed");
                stats.record_outcome(false);
                None
            }
        }
    }

    /// Fetches `url`, retrying per the policy.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<u8>)` - The response body on success
    /// - `Err((DownloadError, u32))` - Error and total attempt count on failure
    async fn fetch_with_retry(
        &self,
        url: &str,
        stats: &DownloadStats,
        progress: Option<&TransferProgressFn>,
    ) -> Result<Vec<u8>, (DownloadError, u32)> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            debug!(url = %url, attempt, "attempting download");

            match self.transport.fetch_with_progress(url, progress).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => match self.retry_policy.should_retry(classify_error(&e), attempt) {
                    RetryDecision::Retry {
                        delay,
                        attempt: next_attempt,
                    } => {
                        info!(
                            url = %url,
                            attempt = next_attempt,
                            max_attempts = self.retry_policy.max_attempts(),
                            delay_ms = delay.as_millis(),
                            error = %e,
                            "retrying download"
                        );
                        stats.increment_retried();
                        tokio::time::sleep(delay).await;
                    }
                    RetryDecision::DoNotRetry { reason } => {
                        debug!(url = %url, %reason, "not retrying download");
                        return Err((e, attempt));
                    }
                },
            }
        }
    }
}

/// Routes a finished work item by its tag.
///
/// Batch items record into the result table, bump the completed counter and
/// report progress under one lock acquisition. The callback runs while the
/// lock is held, so reported `completed` values arrive in increasing order.
async fn complete<K>(
    work: WorkItem<K>,
    destination: Option<PathBuf>,
    batch: Option<&BatchContext<K>>,
) -> Option<PathBuf>
where
    K: Eq + Hash + fmt::Debug,
{
    match (work, batch) {
        (WorkItem::BulkItem(item), Some(batch)) => {
            let mut state = batch.state.lock().await;
            if state
                .results
                .insert(item.key, destination.clone())
                .is_some()
            {
                warn!(url = %item.url, "duplicate download key; earlier result replaced");
            }
            state.completed += 1;
            if let Some(progress) = &batch.progress {
                progress(state.completed, batch.total);
            }
            destination
        }
        (WorkItem::SingleMap { .. } | WorkItem::BulkItem(_), _) => destination,
    }
}

/// Wraps `report` so it only sees fractions at or above the highest so far.
///
/// A retried fetch restarts at zero; those early fractions are dropped.
fn non_decreasing(report: TransferProgressFn) -> TransferProgressFn {
    let highest = std::sync::Mutex::new(0.0_f32);
    Arc::new(move |fraction| {
        let mut highest = highest.lock().unwrap_or_else(PoisonError::into_inner);
        if fraction >= *highest {
            *highest = fraction;
            report(fraction);
        }
    })
}

/// Runs [`extract_all`] on the blocking pool.
async fn extract_blocking(bytes: Vec<u8>, destination: PathBuf) -> Result<PathBuf, ExtractError> {
    tokio::task::spawn_blocking(move || extract_all(&bytes, &destination).map(|_| destination))
        .await
        .map_err(|e| ExtractError::Task {
            reason: e.to_string(),
        })?
}
