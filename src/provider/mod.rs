//! Provider endpoint clients.
//!
//! Each client holds an immutable base [`Url`] plus identity or credentials,
//! builds request URLs by composing that base with operation-specific paths
//! and queries, and hands them to [`HttpClient`]. Arguments are validated
//! before any request is made.
//!
//! - [`github`]: GitHub REST and GraphQL API
//! - [`github_web`]: links to github.com pages
//! - [`doi`]: DOI citation lookup
//! - [`pypi`], [`conda`], [`readthedocs`]: package index and docs links

pub mod conda;
pub mod doi;
mod error;
pub mod github;
pub mod github_web;
pub mod pypi;
pub mod readthedocs;

pub use error::ProviderError;

use tracing::warn;

use crate::http::{HttpClient, Reachability};
use crate::link::Url;

/// Probes `url` unless the client is offline.
///
/// # Errors
///
/// Returns [`ProviderError::Unreachable`] when the probe ran and failed.
pub(crate) async fn verify_reachable(http: &HttpClient, url: &Url) -> Result<(), ProviderError> {
    match http.check_reachable(url, true).await {
        Reachability::Unreachable => {
            warn!(url = %url, "verification failed");
            Err(ProviderError::Unreachable {
                url: url.to_string(),
            })
        }
        Reachability::Reachable | Reachability::Skipped => Ok(()),
    }
}
