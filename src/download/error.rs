//! Error types for the download helper.

use std::path::PathBuf;

use thiserror::Error;

use crate::http::HttpError;

/// Errors raised by [`download_to_path`](super::download_to_path).
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The destination exists and overwriting was not allowed.
    #[error("refusing to overwrite existing file {path}\n  Suggestion: Pass overwrite=true or choose another destination")]
    AlreadyExists {
        /// Existing destination.
        path: PathBuf,
    },

    /// File system error while inspecting the destination, creating
    /// directories or writing the file.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// Path where the error occurred.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The request failed or the body stream broke.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl DownloadError {
    /// Creates an `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(path: impl Into<PathBuf>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    /// Creates an `Io` error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_display() {
        let msg = DownloadError::already_exists("/tmp/out.txt").to_string();
        assert!(msg.contains("/tmp/out.txt"), "{msg}");
        assert!(msg.contains("overwrite"), "{msg}");
    }

    #[test]
    fn test_io_display_has_path_and_source() {
        let err = DownloadError::io(
            "/readonly/file",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/readonly/file"), "{msg}");
        assert!(msg.contains("denied"), "{msg}");
    }

    #[test]
    fn test_http_error_converts() {
        let err: DownloadError = HttpError::timeout("https://example.com/a").into();
        assert!(matches!(err, DownloadError::Http(HttpError::Timeout { .. })));
    }
}
