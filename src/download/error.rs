//! Error types for the download module.
//!
//! Fetch failures fall into three groups that the retry policy treats
//! differently: transport failures (the request never got an answer),
//! non-success HTTP statuses, and everything else.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching content.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (any status outside 2xx).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Response body, empty when none was sent or it could not be read.
        body: Vec<u8>,
    },

    /// The server accepted the request but the body could not be read.
    #[error("error reading response body from {url}: {source}")]
    Body {
        /// The URL whose body failed.
        url: String,
        /// The underlying stream error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered 2xx with no content.
    #[error("empty response body from {url}")]
    EmptyBody {
        /// The URL that returned nothing.
        url: String,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error with no body.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::http_status_with_body(url, status, Vec::new())
    }

    /// Creates an HTTP status error that keeps the response body.
    pub fn http_status_with_body(url: impl Into<String>, status: u16, body: Vec<u8>) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            body,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a body read error.
    pub fn body(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Body {
            url: url.into(),
            source,
        }
    }

    /// Creates an empty body error.
    pub fn empty_body(url: impl Into<String>) -> Self {
        Self::EmptyBody { url: url.into() }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Returns the URL the failed request targeted.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. }
            | Self::Timeout { url }
            | Self::HttpStatus { url, .. }
            | Self::Body { url, .. }
            | Self::EmptyBody { url }
            | Self::InvalidUrl { url } => url,
        }
    }

    /// Returns the HTTP status for [`DownloadError::HttpStatus`].
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the non-empty body of a [`DownloadError::HttpStatus`].
    #[must_use]
    pub fn error_body(&self) -> Option<&[u8]> {
        match self {
            Self::HttpStatus { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

// No `From<reqwest::Error>`: every variant needs the URL for context, so the
// helper constructors above are the only way in.

/// Errors that can occur while unpacking an archive to disk.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The bytes are not a readable zip archive.
    #[error("invalid archive: {source}")]
    Archive {
        /// The underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// File system error while writing entries.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The blocking extraction task did not finish.
    #[error("extraction task failed: {reason}")]
    Task {
        /// Why the task ended.
        reason: String,
    },
}

impl ExtractError {
    /// Creates an archive error.
    #[must_use]
    pub fn archive(source: zip::result::ZipError) -> Self {
        Self::Archive { source }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_timeout_display() {
        let error = DownloadError::timeout("https://example.com/map.zip");
        assert!(error.to_string().contains("timeout"));
        assert!(error.to_string().contains("https://example.com/map.zip"));
    }

    #[test]
    fn test_download_error_http_status_display() {
        let error = DownloadError::http_status("https://example.com/map.zip", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(
            msg.contains("https://example.com/map.zip"),
            "Expected URL in: {msg}"
        );
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.error_body(), None);
    }

    #[test]
    fn test_download_error_http_status_keeps_body() {
        let error = DownloadError::http_status_with_body(
            "https://example.com/maps/id/zz",
            404,
            br#"{"error":"Not Found"}"#.to_vec(),
        );
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.error_body(), Some(&br#"{"error":"Not Found"}"#[..]));
        assert!(!error.to_string().contains("Not Found"));
    }

    #[test]
    fn test_download_error_empty_body_display() {
        let error = DownloadError::empty_body("https://example.com/map.zip");
        assert!(error.to_string().contains("empty response body"));
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_download_error_invalid_url_display() {
        let error = DownloadError::invalid_url("not-a-url");
        let msg = error.to_string();
        assert!(
            msg.contains("invalid URL"),
            "Expected 'invalid URL' in: {msg}"
        );
        assert_eq!(error.url(), "not-a-url");
    }

    #[test]
    fn test_extract_error_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = ExtractError::io(PathBuf::from("/tmp/maps/a"), io_error);
        let msg = error.to_string();
        assert!(msg.contains("/tmp/maps/a"), "Expected path in: {msg}");
    }
}
