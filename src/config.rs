//! Client configuration: service endpoints, output root, HTTP and batch knobs.

use std::path::{Path, PathBuf};

use crate::download::{
    CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, READ_TIMEOUT_SECS, RetryPolicy,
};
use crate::user_agent;

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.beatsaver.com";

/// Default CDN base URL for covers and previews.
pub const DEFAULT_CDN_URL: &str = "https://cdn.beatsaver.com";

/// Default folder maps are extracted under (the Quest SongCore levels folder).
pub const DEFAULT_OUTPUT_ROOT: &str =
    "/sdcard/ModData/com.beatgames.beatsaber/Mods/SongCore/CustomLevels";

/// Settings for a [`BeatSaverClient`](crate::api::BeatSaverClient).
///
/// # Example
///
/// ```
/// use beatsaver_core::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_output_root("./CustomLevels")
///     .with_concurrency(4);
/// assert_eq!(config.concurrency(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_url: String,
    cdn_url: String,
    output_root: PathBuf,
    user_agent: String,
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
    concurrency: usize,
    retry_policy: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cdn_url: DEFAULT_CDN_URL.to_string(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            user_agent: user_agent::default_user_agent(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            concurrency: DEFAULT_CONCURRENCY,
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Sets the API base URL. A trailing `/` is dropped.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = trim_base(api_url.into());
        self
    }

    /// Sets the CDN base URL. A trailing `/` is dropped.
    #[must_use]
    pub fn with_cdn_url(mut self, cdn_url: impl Into<String>) -> Self {
        self.cdn_url = trim_base(cdn_url.into());
        self
    }

    /// Sets the folder maps are extracted under.
    #[must_use]
    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }

    /// Sets the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets connect and read timeouts, in seconds.
    #[must_use]
    pub fn with_timeouts(mut self, connect_secs: u64, read_secs: u64) -> Self {
        self.connect_timeout_secs = connect_secs;
        self.read_timeout_secs = read_secs;
        self
    }

    /// Sets the batch concurrency limit, clamped to at least 1.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Sets the retry policy for archive downloads.
    #[must_use]
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    #[must_use]
    pub fn cdn_url(&self) -> &str {
        &self.cdn_url
    }

    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn connect_timeout_secs(&self) -> u64 {
        self.connect_timeout_secs
    }

    #[must_use]
    pub fn read_timeout_secs(&self) -> u64 {
        self.read_timeout_secs
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}

fn trim_base(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
