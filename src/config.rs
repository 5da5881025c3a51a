//! Client configuration shared by every network-facing component.
//!
//! A [`LinkConfig`] is built once by the hosting application (directly, or
//! from environment variables) and copied into each
//! [`HttpClient`](crate::http::HttpClient). Nothing reads configuration from
//! global state after that point.

use tracing::warn;

/// Default HTTP connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default HTTP read timeout in seconds.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Environment variable that switches offline mode on (`1`, `true`, `yes`).
pub const OFFLINE_ENV: &str = "WEBLINKS_OFFLINE";

/// Environment variable overriding the connect timeout.
pub const CONNECT_TIMEOUT_ENV: &str = "WEBLINKS_CONNECT_TIMEOUT_SECS";

/// Environment variable overriding the read timeout.
pub const READ_TIMEOUT_ENV: &str = "WEBLINKS_READ_TIMEOUT_SECS";

/// Settings for HTTP clients and reachability checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// When set, reachability probes are skipped even if a caller asks for them.
    pub offline: bool,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub read_timeout_secs: u64,
    /// User-Agent override; the crate default is used when `None`.
    pub user_agent: Option<String>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            offline: false,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl LinkConfig {
    /// Configuration with reachability probes disabled.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// Builds a configuration from `WEBLINKS_*` environment variables,
    /// falling back to defaults for unset or unparsable values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            offline: lookup(OFFLINE_ENV).is_some_and(|value| parse_flag(&value)),
            connect_timeout_secs: parse_secs(CONNECT_TIMEOUT_ENV, lookup(CONNECT_TIMEOUT_ENV))
                .unwrap_or(defaults.connect_timeout_secs),
            read_timeout_secs: parse_secs(READ_TIMEOUT_ENV, lookup(READ_TIMEOUT_ENV))
                .unwrap_or(defaults.read_timeout_secs),
            user_agent: None,
        }
    }

    /// Sets the offline switch.
    #[must_use]
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Sets both timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        self.connect_timeout_secs = connect_timeout_secs;
        self.read_timeout_secs = read_timeout_secs;
        self
    }

    /// Overrides the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_secs(name: &str, value: Option<String>) -> Option<u64> {
    let value = value?;
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(secs),
        _ => {
            warn!(variable = name, value = %value, "ignoring invalid timeout value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config_is_online() {
        let config = LinkConfig::default();
        assert!(!config.offline);
        assert_eq!(config.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
        assert_eq!(config.read_timeout_secs, DEFAULT_READ_TIMEOUT_SECS);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_from_lookup_reads_offline_flag() {
        for value in ["1", "true", "YES", " on "] {
            let config = LinkConfig::from_lookup(lookup_from(&[(OFFLINE_ENV, value)]));
            assert!(config.offline, "{value:?} should enable offline mode");
        }
        let config = LinkConfig::from_lookup(lookup_from(&[(OFFLINE_ENV, "0")]));
        assert!(!config.offline);
    }

    #[test]
    fn test_from_lookup_reads_timeouts() {
        let config = LinkConfig::from_lookup(lookup_from(&[
            (CONNECT_TIMEOUT_ENV, "3"),
            (READ_TIMEOUT_ENV, "45"),
        ]));
        assert_eq!(config.connect_timeout_secs, 3);
        assert_eq!(config.read_timeout_secs, 45);
    }

    #[test]
    fn test_from_lookup_ignores_invalid_timeouts() {
        let config = LinkConfig::from_lookup(lookup_from(&[
            (CONNECT_TIMEOUT_ENV, "soon"),
            (READ_TIMEOUT_ENV, "0"),
        ]));
        assert_eq!(config.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
        assert_eq!(config.read_timeout_secs, DEFAULT_READ_TIMEOUT_SECS);
    }

    #[test]
    fn test_builder_methods() {
        let config = LinkConfig::default()
            .with_offline(true)
            .with_timeouts(1, 2)
            .with_user_agent("custom/1.0");
        assert!(config.offline);
        assert_eq!(config.connect_timeout_secs, 1);
        assert_eq!(config.read_timeout_secs, 2);
        assert_eq!(config.user_agent.as_deref(), Some("custom/1.0"));
        assert_eq!(LinkConfig::offline(), LinkConfig::default().with_offline(true));
    }
}
