//! Error type for service API calls.

use thiserror::Error;

use crate::download::DownloadError;
use crate::mapping::DecodeError;

/// Errors returned by [`BeatSaverClient`](super::BeatSaverClient).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not produce a usable body.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The body did not decode into the expected record.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The configured base URL cannot carry endpoint paths.
    #[error("invalid base URL: {url}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Creates an invalid base URL error.
    pub fn invalid_base_url(url: impl Into<String>) -> Self {
        Self::InvalidBaseUrl { url: url.into() }
    }

    /// Returns true when the service itself reported the failure.
    #[must_use]
    pub fn is_remote_reported(&self) -> bool {
        matches!(self, Self::Decode(DecodeError::RemoteReported { .. }))
    }
}

// `From` is implemented only for the wrapped layer errors; both already
// carry the URL or key that failed.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_wraps_layers_transparently() {
        let error = ApiError::from(DownloadError::http_status("https://x/maps/id/1", 404));
        assert!(error.to_string().contains("404"));

        let error = ApiError::from(DecodeError::remote_reported("Not Found"));
        assert_eq!(error.to_string(), "Site Error: Not Found");
        assert!(error.is_remote_reported());
    }

    #[test]
    fn test_invalid_base_url_display() {
        let msg = ApiError::invalid_base_url("mailto:x").to_string();
        assert!(msg.contains("mailto:x"), "Expected URL in: {msg}");
    }
}
