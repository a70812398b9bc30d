//! The fetch seam between the download engine and the network.

use std::sync::Arc;

use async_trait::async_trait;

use super::DownloadError;

/// Per-transfer progress callback, invoked with the fraction received in `0.0..=1.0`.
pub type TransferProgressFn = Arc<dyn Fn(f32) + Send + Sync>;

/// Fetches the full body of a URL.
///
/// [`HttpClient`](super::HttpClient) is the production implementation. The
/// trait is object safe so the engine can hold an `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns its body.
    ///
    /// # Errors
    ///
    /// Returns a [`DownloadError`] describing why the body could not be
    /// obtained. Connection-level failures must use
    /// [`DownloadError::Network`] or [`DownloadError::Timeout`] so the retry
    /// policy can tell them apart from other failures.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError>;

    /// Fetches `url`, reporting the received fraction to `progress`.
    ///
    /// The default reports `1.0` once the whole body has arrived.
    /// Implementations that stream should report intermediate fractions too.
    ///
    /// # Errors
    ///
    /// Same as [`Transport::fetch`].
    async fn fetch_with_progress(
        &self,
        url: &str,
        progress: Option<&TransferProgressFn>,
    ) -> Result<Vec<u8>, DownloadError> {
        let body = self.fetch(url).await?;
        if let Some(progress) = progress {
            progress(1.0);
        }
        Ok(body)
    }
}
