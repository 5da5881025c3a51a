//! Error type shared by all provider clients.

use std::path::PathBuf;

use thiserror::Error;

use crate::download::DownloadError;
use crate::http::HttpError;
use crate::link::UrlError;
use crate::validate::ValidationError;

/// Errors raised by provider operations.
///
/// Lower-layer errors are carried unchanged so callers can still match on,
/// for example, `HttpError::Status { status: 404, .. }`.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// An argument was rejected before any request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A URL could not be built or parsed.
    #[error(transparent)]
    Url(#[from] UrlError),

    /// The HTTP call failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A file download failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The response decoded fine but lacks an expected field or has the wrong shape.
    #[error("unexpected response for {context}: {detail}")]
    UnexpectedPayload {
        /// Operation being performed.
        context: String,
        /// What was missing or wrong, usually including the payload.
        detail: String,
    },

    /// A GraphQL call embedded in a larger operation returned errors.
    #[error("GraphQL {operation} failed: {errors}")]
    GraphQl {
        /// Query or mutation name.
        operation: String,
        /// Raw `errors` array.
        errors: String,
    },

    /// An online check found the resource missing.
    #[error("{url} is not reachable\n  Suggestion: Check the name, or run in offline mode to skip verification")]
    Unreachable {
        /// Probed URL.
        url: String,
    },

    /// A local file could not be read.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ProviderError {
    /// Creates an `UnexpectedPayload` error.
    #[must_use]
    pub fn unexpected(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnexpectedPayload {
            context: context.into(),
            detail: detail.into(),
        }
    }

    /// Creates a `GraphQl` error from an error envelope.
    #[must_use]
    pub fn graphql(operation: impl Into<String>, errors: &serde_json::Value) -> Self {
        Self::GraphQl {
            operation: operation.into(),
            errors: errors.to_string(),
        }
    }

    /// HTTP status code when the failure was a non-2xx response.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http(error) | Self::Download(DownloadError::Http(error)) => error.status_code(),
            _ => None,
        }
    }
}
