//! Error types for URL construction.

use thiserror::Error;

/// Errors raised while parsing or assembling a [`Url`](super::Url).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// The input could not be split into a scheme and a host.
    #[error("malformed URL '{input}': {reason}\n  Suggestion: {suggestion}")]
    Malformed {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
        /// How to fix it.
        suggestion: String,
    },

    /// The scheme is outside the supported set.
    #[error("unsupported scheme '{scheme}' in '{input}'\n  Suggestion: Use http:// or https:// URLs")]
    UnsupportedScheme {
        /// The rejected input.
        input: String,
        /// The scheme that was found.
        scheme: String,
    },
}

impl UrlError {
    /// Creates a `Malformed` error from a parser message.
    #[must_use]
    pub fn malformed(input: &str, reason: &str) -> Self {
        Self::Malformed {
            input: input.to_string(),
            reason: reason.to_string(),
            suggestion: "Use an absolute URL such as https://example.com/path".to_string(),
        }
    }

    /// Creates a `Malformed` error for a missing or empty host.
    #[must_use]
    pub fn no_host(input: &str) -> Self {
        Self::Malformed {
            input: input.to_string(),
            reason: "URL has no host".to_string(),
            suggestion: "Ensure the URL includes a domain (e.g., example.com)".to_string(),
        }
    }

    /// Creates a `Malformed` error for a host containing URL delimiters.
    #[must_use]
    pub fn invalid_host(input: &str) -> Self {
        Self::Malformed {
            input: input.to_string(),
            reason: "host contains whitespace or URL delimiters".to_string(),
            suggestion: "Pass only the host name (and optional :port); add paths with append_path"
                .to_string(),
        }
    }

    /// Creates an `UnsupportedScheme` error.
    #[must_use]
    pub fn unsupported_scheme(input: &str, scheme: &str) -> Self {
        Self::UnsupportedScheme {
            input: input.to_string(),
            scheme: scheme.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_contains_input_and_reason() {
        let msg = UrlError::malformed("not a url", "relative URL without a base").to_string();
        assert!(msg.contains("not a url"), "should contain input: {msg}");
        assert!(msg.contains("relative URL"), "should contain reason: {msg}");
    }

    #[test]
    fn test_unsupported_scheme_message() {
        let msg = UrlError::unsupported_scheme("ftp://example.com", "ftp").to_string();
        assert!(msg.contains("'ftp'"), "should name scheme: {msg}");
        assert!(msg.contains("https://"), "should suggest https: {msg}");
    }

    #[test]
    fn test_no_host_message() {
        let msg = UrlError::no_host("https://").to_string();
        assert!(msg.contains("no host"), "should mention missing host: {msg}");
    }
}
