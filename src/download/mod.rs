//! Streaming file download to a local path.
//!
//! The body is written chunk by chunk through a `BufWriter`, so large files
//! never sit in memory. A transfer that fails midway leaves the partially
//! written file on disk; callers decide whether to remove or retry it.

mod error;

pub use error::DownloadError;

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{info, instrument, warn};

use crate::http::{HttpClient, HttpError, Request, ResponseKind};
use crate::link::Url;

/// Destination handling for [`download_to_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Create missing parent directories.
    pub create_dirs: bool,
    /// Replace an existing file instead of failing.
    pub overwrite: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            create_dirs: true,
            overwrite: false,
        }
    }
}

/// A completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Written file.
    pub path: PathBuf,
    /// Number of bytes written.
    pub bytes: u64,
}

/// Downloads `url` into the file `dest`.
///
/// # Errors
///
/// - [`DownloadError::AlreadyExists`] if `dest` exists and `overwrite` is off;
///   checked before any network I/O
/// - [`DownloadError::Io`] if the destination cannot be inspected, or for
///   directory creation or write failures
/// - [`DownloadError::Http`] for non-2xx statuses and transport failures;
///   a status error is raised before `dest` is created, a mid-stream failure
///   leaves the partial file behind
#[instrument(skip(http, options), fields(url = %url, dest = %dest.display()))]
pub async fn download_to_path(
    http: &HttpClient,
    url: &Url,
    dest: &Path,
    options: DownloadOptions,
) -> Result<DownloadedFile, DownloadError> {
    if !options.overwrite
        && tokio::fs::try_exists(dest)
            .await
            .map_err(|e| DownloadError::io(dest, e))?
    {
        return Err(DownloadError::already_exists(dest));
    }
    if options.create_dirs
        && let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty())
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DownloadError::io(parent, e))?;
    }

    let request = Request::get(url.clone()).expect(ResponseKind::Bytes);
    let response = http.execute(&request).await?;

    let mut file = File::create(dest)
        .await
        .map_err(|e| DownloadError::io(dest, e))?;
    let bytes = stream_to_file(&mut file, response, &url.to_string(), dest)
        .await
        .inspect_err(|error| {
            warn!(path = %dest.display(), error = %error, "download failed, partial file left on disk");
        })?;

    info!(path = %dest.display(), bytes, "download complete");
    Ok(DownloadedFile {
        path: dest.to_path_buf(),
        bytes,
    })
}

async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| HttpError::transport(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(|e| DownloadError::io(path, e))?;
    Ok(bytes_written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_create_dirs_and_refuse_overwrite() {
        let options = DownloadOptions::default();
        assert!(options.create_dirs);
        assert!(!options.overwrite);
    }
}
