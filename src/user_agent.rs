//! Shared User-Agent string for API and download traffic.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/beatsaver-rs/beatsaver";

/// Default User-Agent for every request the client sends.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("beatsaver/{version} (+{PROJECT_UA_URL})")
}
