//! GitHub REST and GraphQL client.
//!
//! [`GitHub`] carries the HTTP client, the API and upload base URLs and an
//! optional bearer token. [`User`] and [`Repo`] are cheap handles derived
//! from it; repository operations are spread over several `impl Repo` blocks
//! grouped by API area.
//!
//! Every request carries `X-GitHub-Api-Version: 2022-11-28` and, when a token
//! is configured, `Authorization: Bearer <token>`.

mod branches;
mod issues;
mod labels;
mod pages;
mod pulls;
mod releases;
mod repo;
mod user;

pub use branches::{BranchProtectionRule, LinkedBranch};
pub use issues::{IssueState, IssueStateReason, IssueUpdate};
pub use labels::LabelUpdate;
pub use pages::{PagesBuild, PagesPath, PagesUpdate};
pub use pulls::{
    MergeMethod, PullCreate, PullFilter, PullMerge, PullSort, PullState, PullUpdate,
    SortDirection,
};
pub use releases::{MakeLatest, ReleaseCreate};
pub use repo::{
    DiscussionCategory, MergeCommitMessage, MergeCommitTitle, Repo, RepoUpdate,
    SquashMergeCommitMessage, SquashMergeCommitTitle, TagName, Visibility, WorkflowPermission,
};
pub use user::User;

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::ProviderError;
use crate::http::{HttpClient, Method, Payload, Request};
use crate::link::Url;
use crate::pagination::Paginator;

/// REST API version sent with every request.
pub const API_VERSION: &str = "2022-11-28";

/// Default REST and GraphQL base URL.
pub const API_BASE_URL: &str = "https://api.github.com";

/// Default release-asset upload base URL.
pub const UPLOAD_BASE_URL: &str = "https://uploads.github.com";

/// Which GitHub host a REST path is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `api.github.com`
    Api,
    /// `uploads.github.com`
    Upload,
}

/// Result of a GraphQL mutation.
///
/// GraphQL reports failures inside a 200 response; those are surfaced as
/// `Errors` with the raw envelope instead of an `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T = Value> {
    /// `data[mutationName]`, possibly reshaped.
    Data(T),
    /// The full response containing an `errors` array.
    Errors(Value),
}

impl<T> MutationOutcome<T> {
    /// Returns the data, discarding an error envelope.
    pub fn data(self) -> Option<T> {
        match self {
            Self::Data(data) => Some(data),
            Self::Errors(_) => None,
        }
    }

    /// Whether the mutation reported errors.
    pub fn is_errors(&self) -> bool {
        matches!(self, Self::Errors(_))
    }

    /// Reshapes the data with a fallible function, keeping error envelopes.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `f`.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<MutationOutcome<U>, E> {
        match self {
            Self::Data(data) => f(data).map(MutationOutcome::Data),
            Self::Errors(errors) => Ok(MutationOutcome::Errors(errors)),
        }
    }
}

/// GitHub API client.
#[derive(Clone)]
pub struct GitHub {
    http: HttpClient,
    api: Url,
    upload: Url,
    token: Option<String>,
}

impl fmt::Debug for GitHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHub")
            .field("api", &self.api)
            .field("upload", &self.upload)
            .field("authenticated", &self.authenticated())
            .finish_non_exhaustive()
    }
}

impl GitHub {
    /// Creates a client against the public GitHub endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Url`] if the built-in endpoints fail to parse.
    pub fn new(http: HttpClient, token: Option<String>) -> Result<Self, ProviderError> {
        Ok(Self::with_endpoints(
            http,
            token,
            Url::parse(API_BASE_URL)?,
            Url::parse(UPLOAD_BASE_URL)?,
        ))
    }

    /// Creates a client against custom endpoints (GitHub Enterprise, mock servers).
    #[must_use]
    pub fn with_endpoints(http: HttpClient, token: Option<String>, api: Url, upload: Url) -> Self {
        Self {
            http,
            api,
            upload,
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Whether a token is configured.
    #[must_use]
    pub fn authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The HTTP client used for requests.
    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Handle for a user account.
    #[must_use]
    pub fn user(&self, username: impl Into<String>) -> User {
        User::new(self.clone(), username.into())
    }

    /// Handle for a repository.
    #[must_use]
    pub fn repo(&self, owner: impl Into<String>, name: impl Into<String>) -> Repo {
        Repo::new(self.clone(), owner.into(), name.into())
    }

    /// Resolves a slash-separated REST path against an endpoint.
    #[must_use]
    pub fn rest_url(&self, endpoint: Endpoint, path: &str) -> Url {
        match endpoint {
            Endpoint::Api => self.api.join(path),
            Endpoint::Upload => self.upload.join(path),
        }
    }

    /// Builds a request with the API version and authorization headers set.
    #[must_use]
    pub fn request(&self, method: Method, url: Url) -> Request {
        let request = Request::new(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    /// Sends a request built with [`request`](Self::request).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] for any HTTP failure.
    pub async fn send(&self, request: Request) -> Result<Payload, ProviderError> {
        Ok(self.http.send(request).await?)
    }

    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<T, ProviderError> {
        let mut request = self.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(self.http.json(request).await?)
    }

    pub(crate) async fn call_empty(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<(), ProviderError> {
        let mut request = self.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(self.http.send_empty(request).await?)
    }

    pub(crate) async fn paginate<T: DeserializeOwned>(
        &self,
        url: &Url,
        max_items: Option<usize>,
    ) -> Result<Vec<T>, ProviderError> {
        Paginator::default()
            .with_max_items(max_items)
            .collect(|page| {
                let request = self.request(Method::Get, page.apply_to(url));
                async move { Ok::<_, ProviderError>(self.http.json::<Vec<T>>(request).await?) }
            })
            .await
    }

    /// Runs a GraphQL query (or an inline mutation) and returns the full response.
    ///
    /// `query` is the selection without the outer braces.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] for transport or status failures.
    /// GraphQL `errors` are left in the returned value.
    #[instrument(skip(self, query), fields(mutation))]
    pub async fn graphql_query(&self, query: &str, mutation: bool) -> Result<Value, ProviderError> {
        let prefix = if mutation { "mutation " } else { "" };
        let body = json!({ "query": format!("{prefix}{{{query}}}") });
        self.call(Method::Post, self.rest_url(Endpoint::Api, "graphql"), Some(body))
            .await
    }

    /// Runs a named mutation with a typed input object.
    ///
    /// Sends `mutation($mutationInput:<input_type>!) {<name>(input:$mutationInput) {<payload>}}`
    /// and unwraps `data[name]`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] for transport or status failures and
    /// [`ProviderError::UnexpectedPayload`] when `data[name]` is absent.
    #[instrument(skip(self, input, payload))]
    pub async fn graphql_mutation(
        &self,
        name: &str,
        input_type: &str,
        input: Value,
        payload: &str,
    ) -> Result<MutationOutcome, ProviderError> {
        let query = format!(
            "mutation($mutationInput:{input_type}!) {{{name}(input:$mutationInput) {{{payload}}}}}"
        );
        let body = json!({
            "query": query,
            "variables": { "mutationInput": input },
        });
        let mut response: Value = self
            .call(Method::Post, self.rest_url(Endpoint::Api, "graphql"), Some(body))
            .await?;

        if response.get("errors").is_some() {
            debug!(mutation = name, "mutation returned errors");
            return Ok(MutationOutcome::Errors(response));
        }
        match response.get_mut("data").and_then(|data| data.get_mut(name)) {
            Some(data) => Ok(MutationOutcome::Data(data.take())),
            None => Err(ProviderError::unexpected(
                name,
                format!("response has no data.{name}: {response}"),
            )),
        }
    }
}

/// Follows `path` through nested JSON objects.
pub(crate) fn pluck<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}
