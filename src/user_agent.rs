//! Shared User-Agent string for every HTTP client built by the crate.
//!
//! GitHub rejects API requests without a User-Agent, so every client sends
//! one that names the tool and its version.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/weblinks";

/// Default User-Agent for API, probe and download requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("weblinks/{version} (+{PROJECT_UA_URL})")
}
