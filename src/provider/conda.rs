//! Links to packages on anaconda.org.

use crate::http::HttpClient;
use crate::link::Url;
use crate::provider::{ProviderError, verify_reachable};
use crate::validate;

/// Package host.
pub const CONDA_BASE_URL: &str = "https://anaconda.org";

/// A package in a conda channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondaProject {
    name: String,
    channel: String,
    home: Url,
}

impl CondaProject {
    /// Validates the package name and builds `https://anaconda.org/{channel}/{name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] for an invalid distribution name
    /// or an empty channel.
    pub fn new(name: &str, channel: &str) -> Result<Self, ProviderError> {
        validate::distribution_name(name)?;
        validate::non_empty("channel", channel)?;
        let home = Url::parse(CONDA_BASE_URL)?.append_path([channel, name]);
        Ok(Self {
            name: name.to_string(),
            channel: channel.to_string(),
            home,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    #[must_use]
    pub fn home(&self) -> &Url {
        &self.home
    }

    /// Confirms the package page exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unreachable`] when the probe fails.
    pub async fn verify(&self, http: &HttpClient) -> Result<(), ProviderError> {
        verify_reachable(http, &self.home).await
    }
}
