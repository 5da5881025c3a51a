//! Links to Read the Docs projects.

use crate::http::HttpClient;
use crate::link::Url;
use crate::provider::{ProviderError, verify_reachable};
use crate::validate;

/// Dashboard host.
pub const READTHEDOCS_BASE_URL: &str = "https://readthedocs.org";

/// A Read the Docs project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadTheDocs {
    project: String,
    project_url: Url,
    website_url: Url,
}

impl ReadTheDocs {
    /// Builds the dashboard and website URLs for `project`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] for an empty project slug and
    /// [`ProviderError::Url`] when the slug is not a valid host label.
    pub fn new(project: &str) -> Result<Self, ProviderError> {
        validate::non_empty("project", project)?;
        let project_url = Url::parse(READTHEDOCS_BASE_URL)?.append_path(["projects", project]);
        let website_url = Url::https(format!("{project}.readthedocs.io"))?;
        Ok(Self {
            project: project.to_string(),
            project_url,
            website_url,
        })
    }

    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// `https://readthedocs.org/projects/{project}`
    #[must_use]
    pub fn project_url(&self) -> &Url {
        &self.project_url
    }

    /// `https://{project}.readthedocs.io`
    #[must_use]
    pub fn website_url(&self) -> &Url {
        &self.website_url
    }

    /// Build list of the project.
    #[must_use]
    pub fn build_status_url(&self) -> Url {
        self.project_url.append_segment("builds")
    }

    /// Confirms the project dashboard exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unreachable`] when the probe fails.
    pub async fn verify(&self, http: &HttpClient) -> Result<(), ProviderError> {
        verify_reachable(http, &self.project_url).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let rtd = ReadTheDocs::new("pylinks").unwrap();
        assert_eq!(rtd.project_url().to_string(), "https://readthedocs.org/projects/pylinks");
        assert_eq!(rtd.build_status_url().to_string(), "https://readthedocs.org/projects/pylinks/builds");
        assert_eq!(rtd.website_url().to_string(), "https://pylinks.readthedocs.io");
    }

    #[test]
    fn test_slug_with_slash_is_rejected() {
        assert!(ReadTheDocs::new("a/b").is_err());
    }
}
