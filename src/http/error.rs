//! Error types for the HTTP request layer.

use thiserror::Error;

use crate::link::UrlError;

/// Errors raised by [`HttpClient`](super::HttpClient).
///
/// Transport errors are wrapped with [`HttpError::transport`], which attaches
/// the request URL; there is no `From<reqwest::Error>`.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The server answered with a status outside the 2xx range.
    #[error("HTTP {status} from {method} {url}\n  Response: {body}")]
    Status {
        /// Request URL.
        url: String,
        /// Request method.
        method: String,
        /// HTTP status code.
        status: u16,
        /// Raw response body, unmodified.
        body: String,
    },

    /// The response body could not be decoded into the requested shape.
    #[error("cannot decode {expected} response from {url}: {reason}")]
    Decode {
        /// Request URL.
        url: String,
        /// Requested shape (`json`, `text`, ...).
        expected: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// The request body could not be serialized.
    #[error("cannot encode request body for {url}: {reason}")]
    Encode {
        /// Request URL.
        url: String,
        /// Serializer message.
        reason: String,
    },

    /// The request could not be assembled (invalid header name or value).
    #[error("invalid request to {url}: {reason}")]
    InvalidRequest {
        /// Request URL.
        url: String,
        /// Why the request was rejected.
        reason: String,
    },

    /// Transport-level failure (DNS, connection refused, TLS, broken body stream).
    #[error("network error for {url}: {source}")]
    Network {
        /// Request URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The request exceeded its timeout.
    #[error("timeout requesting {url}")]
    Timeout {
        /// Request URL.
        url: String,
    },

    /// The target URL was rejected before sending.
    #[error(transparent)]
    Url(#[from] UrlError),

    /// The underlying HTTP client could not be constructed.
    #[error("cannot build HTTP client: {reason}")]
    ClientBuild {
        /// Builder failure message.
        reason: String,
    },
}

impl HttpError {
    /// Creates a `Status` error.
    #[must_use]
    pub fn status(
        url: impl Into<String>,
        method: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self::Status {
            url: url.into(),
            method: method.into(),
            status,
            body: body.into(),
        }
    }

    /// Creates a `Decode` error.
    #[must_use]
    pub fn decode(url: impl Into<String>, expected: &'static str, reason: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            expected,
            reason: reason.into(),
        }
    }

    /// Creates an `Encode` error.
    #[must_use]
    pub fn encode(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Encode {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Classifies a transport error into `Timeout`, `InvalidRequest` or `Network`.
    #[must_use]
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else if source.is_builder() {
            Self::InvalidRequest {
                url,
                reason: source.to_string(),
            }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates a `Timeout` error.
    #[must_use]
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// HTTP status code, when the error came from a response.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_keeps_body_verbatim() {
        let body = r#"{"message":"Not Found"}"#;
        let error = HttpError::status("https://api.github.com/x", "GET", 404, body);
        match &error {
            HttpError::Status { status, body: got, .. } => {
                assert_eq!(*status, 404);
                assert_eq!(got, body);
            }
            other => panic!("expected Status, got {other:?}"),
        }
        let msg = error.to_string();
        assert!(msg.contains("404"), "missing status: {msg}");
        assert!(msg.contains("Not Found"), "missing body: {msg}");
        assert_eq!(error.status_code(), Some(404));
    }

    #[test]
    fn test_decode_error_display() {
        let error = HttpError::decode("https://example.com", "json", "expected value at line 1");
        let msg = error.to_string();
        assert!(msg.contains("json"));
        assert!(msg.contains("https://example.com"));
        assert_eq!(error.status_code(), None);
    }

    #[test]
    fn test_url_error_converts() {
        let error: HttpError = UrlError::no_host("https://").into();
        assert!(matches!(error, HttpError::Url(UrlError::Malformed { .. })));
    }
}
