//! Online reachability checks for URLs.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, instrument};

use super::HttpClient;
use crate::link::Url;

/// Timeout applied to reachability probes issued through
/// [`HttpClient::check_reachable`].
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of a gated reachability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    /// No probe was issued: the client is offline or the caller did not ask.
    Skipped,
    /// The URL answered with a 2xx or 3xx status.
    Reachable,
    /// Connection failure, timeout or an error status.
    Unreachable,
}

impl Reachability {
    /// `true` unless the probe ran and failed.
    #[must_use]
    pub fn is_acceptable(self) -> bool {
        !matches!(self, Self::Unreachable)
    }
}

impl HttpClient {
    /// Probes `url` with `HEAD`, falling back to `GET` when the server does
    /// not implement `HEAD`.
    ///
    /// Returns `false` on any connection error, timeout or status outside
    /// 2xx/3xx. Never fails. This call always touches the network; use
    /// [`check_reachable`](Self::check_reachable) to honor the offline switch.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn is_reachable(&self, url: &Url, timeout: Duration) -> bool {
        let Ok(target) = url.to_parsed() else {
            return false;
        };

        let head = self
            .inner()
            .head(target.clone())
            .timeout(timeout)
            .send()
            .await;
        let status = match head {
            Ok(response)
                if matches!(
                    response.status(),
                    StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
                ) =>
            {
                debug!(status = response.status().as_u16(), "HEAD rejected, retrying with GET");
                match self.inner().get(target).timeout(timeout).send().await {
                    Ok(response) => response.status(),
                    Err(error) => {
                        debug!(error = %error, "GET probe failed");
                        return false;
                    }
                }
            }
            Ok(response) => response.status(),
            Err(error) => {
                debug!(error = %error, "HEAD probe failed");
                return false;
            }
        };

        let reachable = status.is_success() || status.is_redirection();
        debug!(status = status.as_u16(), reachable, "probe finished");
        reachable
    }

    /// Probes `url` only when `requested` is set and the client is online.
    pub async fn check_reachable(&self, url: &Url, requested: bool) -> Reachability {
        if !requested || self.is_offline() {
            debug!(url = %url, requested, offline = self.is_offline(), "skipping reachability probe");
            return Reachability::Skipped;
        }
        if self.is_reachable(url, DEFAULT_PROBE_TIMEOUT).await {
            Reachability::Reachable
        } else {
            Reachability::Unreachable
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::LinkConfig;

    #[tokio::test]
    async fn test_offline_client_skips_probe() {
        let client = HttpClient::new(&LinkConfig::offline()).unwrap();
        // Port 9 on loopback is never contacted when the probe is skipped.
        let url = Url::parse("http://127.0.0.1:9/x").unwrap();
        assert_eq!(client.check_reachable(&url, true).await, Reachability::Skipped);
    }

    #[tokio::test]
    async fn test_unrequested_probe_is_skipped() {
        let client = HttpClient::new(&LinkConfig::default()).unwrap();
        let url = Url::parse("http://127.0.0.1:9/x").unwrap();
        assert_eq!(client.check_reachable(&url, false).await, Reachability::Skipped);
    }

    #[test]
    fn test_reachability_acceptable() {
        assert!(Reachability::Skipped.is_acceptable());
        assert!(Reachability::Reachable.is_acceptable());
        assert!(!Reachability::Unreachable.is_acceptable());
    }
}
