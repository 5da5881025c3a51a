use serde_json::Value;
use tracing::instrument;

use super::{Endpoint, GitHub, Repo};
use crate::http::Method;
use crate::link::Url;
use crate::provider::ProviderError;

/// A GitHub user account.
#[derive(Debug, Clone)]
pub struct User {
    github: GitHub,
    username: String,
}

impl User {
    pub(crate) fn new(github: GitHub, username: String) -> Self {
        Self { github, username }
    }

    /// Account login.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// `users/{username}` on the API endpoint.
    #[must_use]
    pub fn url(&self) -> Url {
        self.github
            .rest_url(Endpoint::Api, "users")
            .append_segment(&self.username)
    }

    /// Profile information.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure (404 for unknown users).
    #[instrument(skip(self), fields(user = %self.username))]
    pub async fn info(&self) -> Result<Value, ProviderError> {
        self.github.call(Method::Get, self.url(), None).await
    }

    /// Linked social accounts.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    #[instrument(skip(self), fields(user = %self.username))]
    pub async fn social_accounts(&self) -> Result<Vec<Value>, ProviderError> {
        self.github
            .call(Method::Get, self.url().append_segment("social_accounts"), None)
            .await
    }

    /// Handle for one of this user's repositories.
    #[must_use]
    pub fn repo(&self, name: impl Into<String>) -> Repo {
        self.github.repo(self.username.clone(), name)
    }
}
