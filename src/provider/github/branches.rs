use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::instrument;

use super::{MutationOutcome, Repo, pluck};
use crate::http::{HttpError, Method};
use crate::provider::ProviderError;
use crate::validate::{self, ValidationError};

/// Branch returned by [`Repo::branch_create_linked`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedBranch {
    pub name: String,
    /// Head commit of the new branch.
    pub sha: String,
}

/// Branch protection rule settings for the GraphQL create and update mutations.
///
/// `None` fields are omitted from the mutation input.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchProtectionRule {
    /// Branch name pattern; required when creating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(rename = "allowsDeletions", skip_serializing_if = "Option::is_none")]
    pub allow_deletions: Option<bool>,
    #[serde(rename = "allowsForcePushes", skip_serializing_if = "Option::is_none")]
    pub allow_force_pushes: Option<bool>,
    #[serde(rename = "blocksCreations", skip_serializing_if = "Option::is_none")]
    pub block_creations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bypass_force_push_actor_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bypass_pull_request_actor_ids: Option<Vec<String>>,
    #[serde(rename = "dismissesStaleReviews", skip_serializing_if = "Option::is_none")]
    pub dismiss_stale_reviews: Option<bool>,
    #[serde(rename = "isAdminEnforced", skip_serializing_if = "Option::is_none")]
    pub enforce_admins: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_allows_fetch_and_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_branch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_actor_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_last_push_approval: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_approving_review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_deployment_environments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_status_check_contexts: Option<Vec<String>>,
    #[serde(rename = "requiresApprovingReviews", skip_serializing_if = "Option::is_none")]
    pub require_approving_reviews: Option<bool>,
    #[serde(rename = "requiresCodeOwnerReviews", skip_serializing_if = "Option::is_none")]
    pub require_codeowner_reviews: Option<bool>,
    #[serde(rename = "requiresCommitSignatures", skip_serializing_if = "Option::is_none")]
    pub require_commit_signatures: Option<bool>,
    #[serde(
        rename = "requiresConversationResolution",
        skip_serializing_if = "Option::is_none"
    )]
    pub require_conversation_resolution: Option<bool>,
    #[serde(rename = "requiresDeployments", skip_serializing_if = "Option::is_none")]
    pub require_deployments: Option<bool>,
    #[serde(rename = "requiresLinearHistory", skip_serializing_if = "Option::is_none")]
    pub require_linear_history: Option<bool>,
    #[serde(rename = "requiresStatusChecks", skip_serializing_if = "Option::is_none")]
    pub require_status_checks: Option<bool>,
    #[serde(rename = "requiresStrictStatusChecks", skip_serializing_if = "Option::is_none")]
    pub require_status_checks_strict: Option<bool>,
    #[serde(rename = "restrictsPushes", skip_serializing_if = "Option::is_none")]
    pub restrict_push: Option<bool>,
    #[serde(rename = "restrictsReviewDismissals", skip_serializing_if = "Option::is_none")]
    pub restrict_review_dismissals: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_dismissal_actor_ids: Option<Vec<String>>,
}

impl BranchProtectionRule {
    /// A rule for `pattern` with every setting left at GitHub's default.
    #[must_use]
    pub fn for_pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    fn mutation_input(&self, context: &str) -> Result<Map<String, Value>, ProviderError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(ProviderError::unexpected(context, format!("not an object: {other}"))),
            Err(e) => Err(HttpError::encode(context, e.to_string()).into()),
        }
    }
}

fn extract_rule_id(data: &Value) -> Result<String, ProviderError> {
    pluck(data, &["branchProtectionRule", "id"])
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ProviderError::unexpected("branchProtectionRule", data.to_string()))
}

impl Repo {
    /// Creates a branch linked to an issue (GraphQL `createLinkedBranch`).
    ///
    /// `name` defaults to one derived from the issue; `repository_id` defaults
    /// to the issue's repository.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnexpectedPayload`] when the data lacks the
    /// branch ref. GraphQL errors come back as [`MutationOutcome::Errors`].
    #[instrument(skip(self), fields(repo = %self.full_name()))]
    pub async fn branch_create_linked(
        &self,
        issue_id: &str,
        base_sha: &str,
        name: Option<&str>,
        repository_id: Option<&str>,
    ) -> Result<MutationOutcome<LinkedBranch>, ProviderError> {
        let mut input = json!({ "issueId": issue_id, "oid": base_sha });
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            input["name"] = json!(name);
        }
        if let Some(repository_id) = repository_id.filter(|r| !r.is_empty()) {
            input["repositoryId"] = json!(repository_id);
        }
        self.github()
            .graphql_mutation(
                "createLinkedBranch",
                "CreateLinkedBranchInput",
                input,
                "linkedBranch { ref { name target { oid } } }",
            )
            .await?
            .try_map(|data| {
                let reference = pluck(&data, &["linkedBranch", "ref"]);
                let name = reference.and_then(|r| r.get("name")).and_then(Value::as_str);
                let sha = reference
                    .and_then(|r| pluck(r, &["target", "oid"]))
                    .and_then(Value::as_str);
                match (name, sha) {
                    (Some(name), Some(sha)) => Ok(LinkedBranch {
                        name: name.to_string(),
                        sha: sha.to_string(),
                    }),
                    _ => Err(ProviderError::unexpected("createLinkedBranch", data.to_string())),
                }
            })
    }

    /// Renames a branch.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] for an empty name.
    #[instrument(skip(self), fields(repo = %self.full_name()))]
    pub async fn branch_rename(&self, old_name: &str, new_name: &str) -> Result<Value, ProviderError> {
        validate::non_empty("branch", old_name)?;
        validate::non_empty("new branch name", new_name)?;
        let url = self
            .endpoint("branches")
            .append_segment(old_name)
            .append_segment("rename");
        self.github()
            .call(Method::Post, url, Some(json!({ "new_name": new_name })))
            .await
    }

    /// Creates a branch protection rule and returns its node ID.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Missing`] without a pattern, before any request.
    #[instrument(skip(self, rule), fields(repo = %self.full_name()))]
    pub async fn branch_protection_rule_create(
        &self,
        rule: &BranchProtectionRule,
    ) -> Result<MutationOutcome<String>, ProviderError> {
        if rule.pattern.as_deref().is_none_or(str::is_empty) {
            return Err(ValidationError::missing("a branch name pattern").into());
        }
        let mut input = rule.mutation_input("createBranchProtectionRule")?;
        input.insert("repositoryId".to_string(), json!(self.node_id().await?));
        self.github()
            .graphql_mutation(
                "createBranchProtectionRule",
                "CreateBranchProtectionRuleInput",
                Value::Object(input),
                "branchProtectionRule {id}",
            )
            .await?
            .try_map(|data| extract_rule_id(&data))
    }

    /// Updates an existing branch protection rule and returns its node ID.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnexpectedPayload`] when the data lacks the rule ID.
    #[instrument(skip(self, rule), fields(repo = %self.full_name()))]
    pub async fn branch_protection_rule_update(
        &self,
        rule_id: &str,
        rule: &BranchProtectionRule,
    ) -> Result<MutationOutcome<String>, ProviderError> {
        let mut input = rule.mutation_input("updateBranchProtectionRule")?;
        input.insert("branchProtectionRuleId".to_string(), json!(rule_id));
        self.github()
            .graphql_mutation(
                "updateBranchProtectionRule",
                "UpdateBranchProtectionRuleInput",
                Value::Object(input),
                "branchProtectionRule {id}",
            )
            .await?
            .try_map(|data| extract_rule_id(&data))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_field_names() {
        let rule = BranchProtectionRule {
            enforce_admins: Some(true),
            require_codeowner_reviews: Some(true),
            require_status_checks_strict: Some(false),
            required_approving_review_count: Some(2),
            bypass_pull_request_actor_ids: Some(vec!["U_1".to_string()]),
            restrict_push: Some(true),
            lock_allows_fetch_and_merge: Some(true),
            ..BranchProtectionRule::for_pattern("main")
        };
        let input = rule.mutation_input("test").unwrap();
        assert_eq!(
            Value::Object(input),
            json!({
                "pattern": "main",
                "isAdminEnforced": true,
                "requiresCodeOwnerReviews": true,
                "requiresStrictStatusChecks": false,
                "requiredApprovingReviewCount": 2,
                "bypassPullRequestActorIds": ["U_1"],
                "restrictsPushes": true,
                "lockAllowsFetchAndMerge": true,
            })
        );
    }

    #[test]
    fn test_default_rule_is_empty_input() {
        let input = BranchProtectionRule::default().mutation_input("test").unwrap();
        assert!(input.is_empty());
    }

    #[test]
    fn test_extract_rule_id() {
        let data = json!({"branchProtectionRule": {"id": "BPR_1"}});
        assert_eq!(extract_rule_id(&data).unwrap(), "BPR_1");
        assert!(extract_rule_id(&json!({})).is_err());
    }
}
