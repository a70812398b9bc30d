//! HTTP client wrapper for fetching response bodies.
//!
//! This module provides the `HttpClient` struct which issues GET requests
//! with proper timeout configuration and maps every failure onto
//! [`DownloadError`].

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, instrument};

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::transport::{TransferProgressFn, Transport};
use crate::user_agent;

/// HTTP client for fetching JSON documents and archives.
///
/// This client is designed to be created once and reused for multiple
/// requests, taking advantage of connection pooling.
///
/// # Example
///
/// ```no_run
/// use beatsaver_core::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let body = client.get_bytes("https://api.beatsaver.com/maps/id/1").await?;
/// println!("fetched {} bytes", body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes (for large archives)
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::build(
            &user_agent::default_user_agent(),
            CONNECT_TIMEOUT_SECS,
            READ_TIMEOUT_SECS,
        )
        .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a new HTTP client with an explicit User-Agent and timeouts.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the TLS backend cannot be
    /// initialized.
    pub fn build(
        user_agent: &str,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns the whole response body.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - The body stream breaks or is empty
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.get_bytes_with_progress(url, None).await
    }

    /// Fetches `url`, reporting the received fraction of the body to `progress`.
    ///
    /// Fractions come from `Content-Length` and never decrease. The last
    /// report is `1.0` once the body is complete. Without a length only the
    /// final `1.0` is reported.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::get_bytes`]. An error status keeps whatever body
    /// the server sent so callers can read the service's own message.
    #[instrument(skip(self, progress), fields(url = %url))]
    pub async fn get_bytes_with_progress(
        &self,
        url: &str,
        progress: Option<&TransferProgressFn>,
    ) -> Result<Vec<u8>, DownloadError> {
        debug!("sending request");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_builder() {
                DownloadError::invalid_url(url)
            } else if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .unwrap_or_default();
            return Err(DownloadError::http_status_with_body(
                url,
                status.as_u16(),
                body,
            ));
        }

        let body = read_body(response, url, progress).await?;
        if body.is_empty() {
            return Err(DownloadError::empty_body(url));
        }

        debug!(bytes = body.len(), "response body received");
        Ok(body)
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.get_bytes(url).await
    }

    async fn fetch_with_progress(
        &self,
        url: &str,
        progress: Option<&TransferProgressFn>,
    ) -> Result<Vec<u8>, DownloadError> {
        self.get_bytes_with_progress(url, progress).await
    }
}

/// Collects the streamed response body, reporting progress per chunk.
async fn read_body(
    response: reqwest::Response,
    url: &str,
    progress: Option<&TransferProgressFn>,
) -> Result<Vec<u8>, DownloadError> {
    let expected = response.content_length().filter(|&len| len > 0);
    let capacity = expected
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or(0);
    let mut body = Vec::with_capacity(capacity);
    let mut stream = response.bytes_stream();
    let mut reported = 0.0_f32;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::body(url, e)
            }
        })?;
        body.extend_from_slice(&chunk);

        if let (Some(progress), Some(expected)) = (progress, expected) {
            let current = fraction(body.len(), expected);
            if current > reported {
                reported = current;
                progress(current);
            }
        }
    }

    if let Some(progress) = progress
        && reported < 1.0
    {
        progress(1.0);
    }

    Ok(body)
}

/// Fraction of `expected` bytes received, capped at `1.0`.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn fraction(received: usize, expected: u64) -> f32 {
    (received as f64 / expected as f64).min(1.0) as f32
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    use crate::test_support::socket_guard::{
        should_skip_socket_bound_test, start_mock_server_or_skip,
    };
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[test]
    fn test_http_client_new_creates_client() {
        let client = HttpClient::new();
        drop(client);
    }

    #[tokio::test]
    async fn test_get_bytes_invalid_url_returns_invalid_url() {
        let client = HttpClient::new();
        let result = client.get_bytes("not-a-valid-url").await;
        assert!(
            matches!(result, Err(DownloadError::InvalidUrl { .. })),
            "expected InvalidUrl, got {result:?}"
        );
    }

    #[tokio::test]
    async fn test_get_bytes_success_returns_body() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/maps/id/1"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"{\"id\":\"1\"}".to_vec()))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let body = client
            .get_bytes(&format!("{}/maps/id/1", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(body, b"{\"id\":\"1\"}");
    }

    #[tokio::test]
    async fn test_get_bytes_404_returns_http_status() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let result = client
            .get_bytes(&format!("{}/missing", mock_server.uri()))
            .await;
        match result {
            Err(DownloadError::HttpStatus { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_bytes_error_status_keeps_body() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/maps/id/zzzz"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(serde_json::json!({"error": "Not Found"})),
            )
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let error = client
            .get_bytes(&format!("{}/maps/id/zzzz", mock_server.uri()))
            .await
            .unwrap_err();

        assert_eq!(error.status(), Some(404));
        let body: serde_json::Value = serde_json::from_slice(error.error_body().unwrap()).unwrap();
        assert_eq!(body["error"], "Not Found");
    }

    // ==================== Transfer Progress Tests ====================

    #[test]
    fn test_fraction_is_capped_at_one() {
        assert!((fraction(0, 10) - 0.0).abs() < f32::EPSILON);
        assert!((fraction(5, 10) - 0.5).abs() < f32::EPSILON);
        assert!((fraction(12, 10) - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_get_bytes_with_progress_reports_non_decreasing_fractions() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let payload = vec![7_u8; 256 * 1024];
        Mock::given(method("GET"))
            .and(path("/big.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
            .mount(&mock_server)
            .await;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress: TransferProgressFn = Arc::new(move |fraction| {
            sink.lock().unwrap().push(fraction);
        });

        let client = HttpClient::new();
        let body = client
            .get_bytes_with_progress(&format!("{}/big.zip", mock_server.uri()), Some(&progress))
            .await
            .unwrap();

        assert_eq!(body.len(), payload.len());
        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(
            seen.windows(2).all(|pair| pair[0] <= pair[1]),
            "fractions went backwards: {seen:?}"
        );
        assert!(seen.iter().all(|f| (0.0..=1.0).contains(f)));
        assert!((seen.last().copied().unwrap() - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_get_bytes_with_progress_silent_on_error_status() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/gone.zip"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let calls = Arc::new(Mutex::new(0_usize));
        let sink = Arc::clone(&calls);
        let progress: TransferProgressFn = Arc::new(move |_| *sink.lock().unwrap() += 1);

        let result = HttpClient::new()
            .get_bytes_with_progress(&format!("{}/gone.zip", mock_server.uri()), Some(&progress))
            .await;

        assert!(result.is_err());
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_bytes_empty_body_is_error() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let result = client
            .get_bytes(&format!("{}/empty", mock_server.uri()))
            .await;
        assert!(matches!(result, Err(DownloadError::EmptyBody { .. })));
    }

    #[tokio::test]
    async fn test_get_bytes_connection_refused_is_network_error() {
        if should_skip_socket_bound_test() {
            return;
        }
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = HttpClient::build("test-agent", 2, 2).unwrap();
        let result = client
            .get_bytes(&format!("http://127.0.0.1:{port}/map.zip"))
            .await;
        assert!(
            matches!(
                result,
                Err(DownloadError::Network { .. } | DownloadError::Timeout { .. })
            ),
            "expected transport failure, got {result:?}"
        );
    }

    #[tokio::test]
    async fn test_transport_impl_delegates_to_get_bytes() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/cover.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1_u8, 2, 3]))
            .mount(&mock_server)
            .await;

        let transport: &dyn Transport = &HttpClient::new();
        let body = transport
            .fetch(&format!("{}/cover.jpg", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(body, vec![1, 2, 3]);
    }
}
