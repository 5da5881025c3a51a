use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::{IssueState, MutationOutcome, Repo};
use crate::http::Method;
use crate::link::Url;
use crate::provider::ProviderError;
use crate::validate::ValidationError;

/// Pull request state filter for [`Repo::pull_list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullState {
    #[default]
    Open,
    Closed,
    All,
}

impl PullState {
    fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

/// Sort key for [`Repo::pull_list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PullSort {
    #[default]
    Created,
    Updated,
    Popularity,
    LongRunning,
}

impl PullSort {
    fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Popularity => "popularity",
            Self::LongRunning => "long-running",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query for [`Repo::pull_list`]. Defaults to open pulls, newest first.
#[derive(Debug, Clone, Default)]
pub struct PullFilter {
    pub state: PullState,
    /// `user:ref-name` or `organization:ref-name`.
    pub head: Option<String>,
    pub base: Option<String>,
    pub sort: PullSort,
    pub direction: SortDirection,
}

impl PullFilter {
    fn apply_to(&self, url: &Url) -> Url {
        let mut url = url.merge_query([
            ("state", self.state.as_str()),
            ("sort", self.sort.as_str()),
            ("direction", self.direction.as_str()),
        ]);
        if let Some(head) = self.head.as_deref().filter(|h| !h.is_empty()) {
            url = url.with_query("head", head);
        }
        if let Some(base) = self.base.as_deref().filter(|b| !b.is_empty()) {
            url = url.with_query("base", base);
        }
        url
    }
}

/// Body for [`Repo::pull_create`]. Either `title` or `issue` is required.
#[derive(Debug, Clone, Serialize)]
pub struct PullCreate {
    pub head: String,
    pub base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Converts an existing issue into the pull request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub maintainer_can_modify: bool,
    pub draft: bool,
    /// Repository of `head` when it lives in a fork of the same network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_repo: Option<String>,
}

impl PullCreate {
    /// A non-draft pull request from `head` into `base` that maintainers may modify.
    #[must_use]
    pub fn new(head: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            base: base.into(),
            title: None,
            issue: None,
            body: None,
            maintainer_can_modify: true,
            draft: false,
            head_repo: None,
        }
    }
}

/// Fields for [`Repo::pull_update`]. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PullUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer_can_modify: Option<bool>,
    /// Applied through a GraphQL mutation before the `PATCH`.
    #[serde(skip)]
    pub draft: Option<bool>,
}

/// How [`Repo::pull_merge`] merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    Merge,
    Squash,
    Rebase,
}

/// Body for [`Repo::pull_merge`]. All fields optional.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PullMerge {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    /// Head SHA the pull request must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_method: Option<MergeMethod>,
}

impl PullMerge {
    fn is_empty(&self) -> bool {
        self.commit_title.is_none()
            && self.commit_message.is_none()
            && self.sha.is_none()
            && self.merge_method.is_none()
    }
}

impl Repo {
    fn pull_url(&self, number: u64, tail: &str) -> Url {
        self.endpoint("pulls")
            .append_segment(number.to_string())
            .join(tail)
    }

    /// Pull requests matching `filter`, fetched 100 per page.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if any page fails.
    #[instrument(skip(self, filter), fields(repo = %self.full_name()))]
    pub async fn pull_list(&self, filter: &PullFilter) -> Result<Vec<Value>, ProviderError> {
        let url = filter.apply_to(&self.endpoint("pulls"));
        self.github().paginate(&url, None).await
    }

    /// A single pull request.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    pub async fn pull(&self, number: u64) -> Result<Value, ProviderError> {
        self.github()
            .call(Method::Get, self.pull_url(number, ""), None)
            .await
    }

    /// Opens a pull request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Missing`] when neither `title` nor `issue`
    /// is set, before any request is made.
    #[instrument(skip(self, pull), fields(repo = %self.full_name(), head = %pull.head))]
    pub async fn pull_create(&self, pull: &PullCreate) -> Result<Value, ProviderError> {
        let has_title = pull.title.as_deref().is_some_and(|t| !t.is_empty());
        if !has_title && pull.issue.is_none() {
            return Err(ValidationError::missing("either title or issue").into());
        }
        self.github()
            .call(Method::Post, self.endpoint("pulls"), Some(json!(pull)))
            .await
    }

    /// Edits a pull request.
    ///
    /// When `draft` is set the pull request is first converted to a draft or
    /// marked ready for review through GraphQL.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::GraphQl`] if the draft mutation reports errors.
    #[instrument(skip(self, update), fields(repo = %self.full_name()))]
    pub async fn pull_update(&self, number: u64, update: &PullUpdate) -> Result<Value, ProviderError> {
        if let Some(draft) = update.draft {
            let (name, input_type) = if draft {
                ("convertPullRequestToDraft", "ConvertPullRequestToDraftInput")
            } else {
                ("markPullRequestReadyForReview", "MarkPullRequestReadyForReviewInput")
            };
            let node_id = self
                .pull(number)
                .await?
                .get("node_id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| ProviderError::unexpected("pull request", "missing node_id"))?;
            let outcome = self
                .github()
                .graphql_mutation(
                    name,
                    input_type,
                    json!({ "pullRequestId": node_id }),
                    "pullRequest {isDraft}",
                )
                .await?;
            if let MutationOutcome::Errors(errors) = outcome {
                return Err(ProviderError::graphql(name, &errors));
            }
            debug!(number, draft, "draft status updated");
        }
        self.github()
            .call(Method::Patch, self.pull_url(number, ""), Some(json!(update)))
            .await
    }

    /// Merges the base branch into the pull request branch.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`]; 422 when `head_sha` is stale.
    pub async fn pull_branch_update(&self, number: u64, head_sha: &str) -> Result<Value, ProviderError> {
        self.github()
            .call(
                Method::Put,
                self.pull_url(number, "update-branch"),
                Some(json!({ "expected_head_sha": head_sha })),
            )
            .await
    }

    /// Merges a pull request. An empty `merge` sends no body.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`]; 405 when the pull is not mergeable.
    #[instrument(skip(self, merge), fields(repo = %self.full_name()))]
    pub async fn pull_merge(&self, number: u64, merge: &PullMerge) -> Result<Value, ProviderError> {
        let body = (!merge.is_empty()).then(|| json!(merge));
        self.github()
            .call(Method::Put, self.pull_url(number, "merge"), body)
            .await
    }
}
