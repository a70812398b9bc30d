//! Constants for the download module (timeouts, retry pacing).

use std::time::Duration;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large archives).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Fixed pause before retrying a retryable failure.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(50);
