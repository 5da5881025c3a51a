use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use super::Repo;
use crate::http::Method;
use crate::link::Url;
use crate::provider::ProviderError;

/// Open or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// Why an issue changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStateReason {
    Completed,
    NotPlanned,
    Reopened,
}

/// Fields for [`Repo::issue_update`]. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_reason: Option<IssueStateReason>,
}

impl Repo {
    /// A single issue (or pull request) by number.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    pub async fn issue(&self, number: u64) -> Result<Value, ProviderError> {
        self.github()
            .call(Method::Get, self.issue_url(number, ""), None)
            .await
    }

    fn issue_url(&self, number: u64, tail: &str) -> Url {
        self.endpoint("issues")
            .append_segment(number.to_string())
            .join(tail)
    }

    /// Edits an issue.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    #[instrument(skip(self, update), fields(repo = %self.full_name()))]
    pub async fn issue_update(&self, number: u64, update: &IssueUpdate) -> Result<Value, ProviderError> {
        self.github()
            .call(Method::Patch, self.issue_url(number, ""), Some(json!(update)))
            .await
    }

    /// Adds assignees to an issue.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    pub async fn issue_add_assignees<S: AsRef<str>>(
        &self,
        number: u64,
        assignees: &[S],
    ) -> Result<Value, ProviderError> {
        let assignees: Vec<&str> = assignees.iter().map(AsRef::as_ref).collect();
        self.github()
            .call(
                Method::Post,
                self.issue_url(number, "assignees"),
                Some(json!({ "assignees": assignees })),
            )
            .await
    }

    /// All labels on an issue, fetched 100 per page.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if any page fails.
    pub async fn issue_labels(&self, number: u64) -> Result<Vec<Value>, ProviderError> {
        self.github()
            .paginate(&self.issue_url(number, "labels"), None)
            .await
    }

    /// Adds labels to an issue, keeping existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    pub async fn issue_labels_add<S: AsRef<str>>(
        &self,
        number: u64,
        labels: &[S],
    ) -> Result<Vec<Value>, ProviderError> {
        self.send_labels(Method::Post, number, labels).await
    }

    /// Replaces all labels on an issue. An empty list removes them all.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    pub async fn issue_labels_set<S: AsRef<str>>(
        &self,
        number: u64,
        labels: &[S],
    ) -> Result<Vec<Value>, ProviderError> {
        self.send_labels(Method::Put, number, labels).await
    }

    async fn send_labels<S: AsRef<str>>(
        &self,
        method: Method,
        number: u64,
        labels: &[S],
    ) -> Result<Vec<Value>, ProviderError> {
        let labels: Vec<&str> = labels.iter().map(AsRef::as_ref).collect();
        self.github()
            .call(
                method,
                self.issue_url(number, "labels"),
                Some(json!({ "labels": labels })),
            )
            .await
    }

    /// Comments on an issue or pull request, oldest first.
    ///
    /// Pages are fetched until a short page or until at least `max_count`
    /// comments are collected; the last page is kept whole.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if any page fails.
    #[instrument(skip(self), fields(repo = %self.full_name()))]
    pub async fn issue_comments(&self, number: u64, max_count: usize) -> Result<Vec<Value>, ProviderError> {
        self.github()
            .paginate(&self.issue_url(number, "comments"), Some(max_count))
            .await
    }

    /// Posts a comment.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    pub async fn issue_comment_create(&self, number: u64, body: &str) -> Result<Value, ProviderError> {
        self.github()
            .call(
                Method::Post,
                self.issue_url(number, "comments"),
                Some(json!({ "body": body })),
            )
            .await
    }

    /// Replaces the body of an existing comment.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    pub async fn issue_comment_update(&self, comment_id: u64, body: &str) -> Result<Value, ProviderError> {
        let url = self
            .endpoint("issues/comments")
            .append_segment(comment_id.to_string());
        self.github()
            .call(Method::Patch, url, Some(json!({ "body": body })))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_update_serializes_only_set_fields() {
        let update = IssueUpdate {
            state: Some(IssueState::Closed),
            state_reason: Some(IssueStateReason::NotPlanned),
            ..IssueUpdate::default()
        };
        assert_eq!(
            json!(update),
            json!({"state": "closed", "state_reason": "not_planned"})
        );
    }
}
