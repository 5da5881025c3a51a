//! Links to projects on the Python Package Index.

use crate::http::HttpClient;
use crate::link::Url;
use crate::provider::{ProviderError, verify_reachable};
use crate::validate;

/// Index host.
pub const PYPI_BASE_URL: &str = "https://pypi.org";

/// A PyPI project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PypiProject {
    name: String,
    home: Url,
}

impl PypiProject {
    /// Validates a distribution name and builds the project URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] for names that are not valid
    /// distribution names.
    pub fn new(name: &str) -> Result<Self, ProviderError> {
        validate::distribution_name(name)?;
        let home = Url::parse(PYPI_BASE_URL)?.append_path(["project", name]);
        Ok(Self {
            name: name.to_string(),
            home,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `https://pypi.org/project/{name}`
    #[must_use]
    pub fn home(&self) -> &Url {
        &self.home
    }

    /// Confirms the project page exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unreachable`] when the probe fails.
    pub async fn verify(&self, http: &HttpClient) -> Result<(), ProviderError> {
        verify_reachable(http, &self.home).await
    }
}
