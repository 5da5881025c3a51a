use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument};

use super::{Endpoint, GitHub, MutationOutcome, pluck};
use crate::download::{DownloadOptions, download_to_path};
use crate::http::{HttpError, Method};
use crate::link::Url;
use crate::provider::ProviderError;
use crate::validate::{self, ValidationError, compile_static_regex};

static SEMVER: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"^\d+\.\d+\.\d+$"));

/// A repository under a user or organization.
///
/// Operations are grouped by API area across this module and its siblings
/// (`issues`, `pulls`, `labels`, `pages`, `releases`, `branches`).
#[derive(Debug, Clone)]
pub struct Repo {
    github: GitHub,
    owner: String,
    name: String,
}

/// A tag matched by [`Repo::tag_names`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagName {
    /// Tag name without the `refs/tags/` prefix.
    pub name: String,
    /// Capture groups of the pattern, empty when it has none.
    /// Groups that did not participate are empty strings.
    pub groups: Vec<String>,
}

/// A repository discussion category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionCategory {
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// GraphQL node ID.
    pub id: String,
}

/// Repository visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// Default title of squash merge commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SquashMergeCommitTitle {
    PrTitle,
    CommitOrPrTitle,
}

/// Default message of squash merge commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SquashMergeCommitMessage {
    PrBody,
    CommitMessages,
    Blank,
}

/// Default title of merge commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeCommitTitle {
    PrTitle,
    MergeMessage,
}

/// Default message of merge commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeCommitMessage {
    PrBody,
    PrTitle,
    Blank,
}

/// Default `GITHUB_TOKEN` permissions for workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowPermission {
    Read,
    Write,
}

/// Repository settings for [`Repo::update`]. `None` fields are left unchanged.
///
/// Most fields go into a single `PATCH /repos/{owner}/{repo}`. The fields
/// marked as separate calls are applied first, each through its own endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_projects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_squash_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_merge_commit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_rebase_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_auto_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_branch_on_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_update_branch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash_merge_commit_title: Option<SquashMergeCommitTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash_merge_commit_message: Option<SquashMergeCommitMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_commit_title: Option<MergeCommitTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_commit_message: Option<MergeCommitMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_forking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_commit_signoff_required: Option<bool>,

    /// Sent in the `security_and_analysis` block.
    #[serde(skip)]
    pub advanced_security: Option<bool>,
    /// Sent in the `security_and_analysis` block.
    #[serde(skip)]
    pub secret_scanning: Option<bool>,
    /// Sent in the `security_and_analysis` block.
    #[serde(skip)]
    pub secret_scanning_push_protection: Option<bool>,

    /// Separate GraphQL `updateRepository` mutation.
    #[serde(skip)]
    pub has_discussions: Option<bool>,
    /// Separate `PUT`/`DELETE` on `automated-security-fixes`.
    #[serde(skip)]
    pub automated_security_fixes: Option<bool>,
    /// Separate `PUT`/`DELETE` on `private-vulnerability-reporting`.
    #[serde(skip)]
    pub private_vulnerability_reporting: Option<bool>,
    /// Separate `PUT`/`DELETE` on `vulnerability-alerts`.
    #[serde(skip)]
    pub vulnerability_alerts: Option<bool>,
}

impl RepoUpdate {
    fn security_and_analysis(&self) -> Option<Value> {
        let mut block = Map::new();
        for (key, value) in [
            ("advanced_security", self.advanced_security),
            ("secret_scanning", self.secret_scanning),
            (
                "secret_scanning_push_protection",
                self.secret_scanning_push_protection,
            ),
        ] {
            if let Some(enabled) = value {
                let status = if enabled { "enabled" } else { "disabled" };
                block.insert(key.to_string(), json!({ "status": status }));
            }
        }
        (!block.is_empty()).then_some(Value::Object(block))
    }

    fn patch_body(&self, url: &Url) -> Result<Map<String, Value>, HttpError> {
        let mut body = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            Ok(other) => return Err(HttpError::encode(url.to_string(), format!("not an object: {other}"))),
            Err(e) => return Err(HttpError::encode(url.to_string(), e.to_string())),
        };
        if let Some(block) = self.security_and_analysis() {
            body.insert("security_and_analysis".to_string(), block);
        }
        Ok(body)
    }
}

impl Repo {
    pub(crate) fn new(github: GitHub, owner: String, name: String) -> Self {
        Self {
            github,
            owner,
            name,
        }
    }

    /// Owner login.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `repos/{owner}/{name}` on the API endpoint.
    #[must_use]
    pub fn url(&self) -> Url {
        self.github
            .rest_url(Endpoint::Api, "repos")
            .append_path([&self.owner, &self.name])
    }

    pub(crate) fn github(&self) -> &GitHub {
        &self.github
    }

    /// `repos/{owner}/{name}/{path}` on the API endpoint.
    pub(crate) fn endpoint(&self, path: &str) -> Url {
        self.url().join(path)
    }

    /// Repository metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    #[instrument(skip(self), fields(repo = %self.full_name()))]
    pub async fn info(&self) -> Result<Value, ProviderError> {
        self.github.call(Method::Get, self.url(), None).await
    }

    pub(crate) fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// GraphQL node ID of the repository, read from [`info`](Self::info).
    pub(crate) async fn node_id(&self) -> Result<String, ProviderError> {
        let info = self.info().await?;
        info.get("node_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::unexpected("repository info", "missing node_id"))
    }

    /// All branches, fetched 100 per page.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if any page fails.
    #[instrument(skip(self), fields(repo = %self.full_name()))]
    pub async fn branches(&self) -> Result<Vec<Value>, ProviderError> {
        self.github.paginate(&self.endpoint("branches"), None).await
    }

    /// Tag references (`git/refs/tags`).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    #[instrument(skip(self), fields(repo = %self.full_name()))]
    pub async fn tags(&self) -> Result<Vec<Value>, ProviderError> {
        self.github
            .call(Method::Get, self.endpoint("git/refs/tags"), None)
            .await
    }

    /// Tag names, optionally filtered by a regex anchored at the start of the name.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] for an invalid pattern and
    /// [`ProviderError::Http`] on request failure.
    pub async fn tag_names(&self, pattern: Option<&str>) -> Result<Vec<TagName>, ProviderError> {
        let matcher = pattern
            .filter(|p| !p.is_empty())
            .map(|p| {
                Regex::new(&format!("^(?:{p})")).map_err(|e| {
                    ValidationError::pattern(
                        "tag pattern",
                        p,
                        &e.to_string(),
                        "Pass a valid regular expression",
                    )
                })
            })
            .transpose()?;

        let names = self.tags().await?.into_iter().filter_map(|tag| {
            tag.get("ref")
                .and_then(Value::as_str)
                .map(|r| r.strip_prefix("refs/tags/").unwrap_or(r).to_string())
        });
        Ok(match matcher {
            None => names
                .map(|name| TagName {
                    name,
                    groups: Vec::new(),
                })
                .collect(),
            Some(regex) => names
                .filter_map(|name| {
                    let groups = regex.captures(&name).map(|caps| {
                        caps.iter()
                            .skip(1)
                            .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
                            .collect()
                    })?;
                    Some(TagName { name, groups })
                })
                .collect(),
        })
    }

    /// Sorted `X.Y.Z` versions from tags named `{prefix}X.Y.Z`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    pub async fn semantic_versions(&self, prefix: &str) -> Result<Vec<(u64, u64, u64)>, ProviderError> {
        let pattern = format!(r"{}(\d+\.\d+\.\d+)$", regex::escape(prefix));
        let mut versions: Vec<(u64, u64, u64)> = self
            .tag_names(Some(&pattern))
            .await?
            .iter()
            .filter_map(|tag| parse_semver(tag.groups.first()?))
            .collect();
        versions.sort_unstable();
        Ok(versions)
    }

    /// GitHub Pages site information.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure (404 when Pages is off).
    pub async fn pages_info(&self) -> Result<Value, ProviderError> {
        self.github.call(Method::Get, self.endpoint("pages"), None).await
    }

    /// Contents of a file or directory. A trailing `/` on `path` is ignored.
    ///
    /// Files come back as an object, directories as an array.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    #[instrument(skip(self), fields(repo = %self.full_name()))]
    pub async fn content(&self, path: &str, git_ref: Option<&str>) -> Result<Value, ProviderError> {
        self.github
            .call(Method::Get, self.content_url(path, git_ref), None)
            .await
    }

    pub(crate) fn content_url(&self, path: &str, git_ref: Option<&str>) -> Url {
        let url = self.endpoint("contents").join(path.trim_end_matches('/'));
        match git_ref {
            Some(r) if !r.is_empty() => url.with_query("ref", r),
            _ => url,
        }
    }

    /// Downloads a single file into `dest_dir`, named `filename` or the file's own name.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::UnexpectedPayload`] if `path` is not a file
    /// - [`ProviderError::Download`] for write or transfer failures
    #[instrument(skip(self, options), fields(repo = %self.full_name()))]
    pub async fn download_file(
        &self,
        path: &str,
        git_ref: Option<&str>,
        dest_dir: &Path,
        filename: Option<&str>,
        options: DownloadOptions,
    ) -> Result<PathBuf, ProviderError> {
        let content = self.content(path, git_ref).await?;
        if content.get("type").and_then(Value::as_str) != Some("file") {
            return Err(ProviderError::unexpected(
                "download_file",
                format!("expected a file, got: {content}"),
            ));
        }
        let (source, repo_path) = file_entry(&content)?;
        let name = match filename {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => file_name(repo_path),
        };
        let dest = dest_dir.join(name);
        download_to_path(self.github.http(), &source, &dest, options).await?;
        Ok(dest)
    }

    /// Downloads every file under a directory.
    ///
    /// Paths below `path` are kept relative to `dest_dir`. Subdirectories are
    /// visited only when `recursive` is set. Existing files are not overwritten.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::UnexpectedPayload`] if `path` is not a directory
    /// - [`ProviderError::Download`] for the first file that fails
    #[instrument(skip(self), fields(repo = %self.full_name()))]
    pub async fn download_dir(
        &self,
        path: &str,
        git_ref: Option<&str>,
        recursive: bool,
        dest_dir: &Path,
        create_dirs: bool,
    ) -> Result<Vec<PathBuf>, ProviderError> {
        let root = path.trim_matches('/');
        let listing = self.content(root, git_ref).await?;
        let Value::Array(entries) = listing else {
            return Err(ProviderError::unexpected(
                "download_dir",
                format!("expected a directory, got: {listing}"),
            ));
        };

        let options = DownloadOptions {
            create_dirs,
            overwrite: false,
        };
        let mut pending: VecDeque<Value> = entries.into();
        let mut written = Vec::new();
        while let Some(entry) = pending.pop_front() {
            match entry.get("type").and_then(Value::as_str) {
                Some("file") => {
                    let (source, repo_path) = file_entry(&entry)?;
                    let relative = Path::new(repo_path)
                        .strip_prefix(root)
                        .map_or_else(|_| PathBuf::from(file_name(repo_path)), Path::to_path_buf);
                    let dest = dest_dir.join(relative);
                    download_to_path(self.github.http(), &source, &dest, options).await?;
                    written.push(dest);
                }
                Some("dir") if recursive => {
                    let Some(dir) = entry.get("path").and_then(Value::as_str) else {
                        continue;
                    };
                    debug!(dir, "descending into directory");
                    match self.content(dir, git_ref).await? {
                        Value::Array(children) => pending.extend(children),
                        single @ Value::Object(_) => pending.push_back(single),
                        other => {
                            return Err(ProviderError::unexpected(
                                "download_dir",
                                format!("unexpected listing for {dir}: {other}"),
                            ));
                        }
                    }
                }
                _ => {}
            }
        }
        info!(files = written.len(), "directory download complete");
        Ok(written)
    }

    /// First 25 discussion categories.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::GraphQl`] when the query reports errors and
    /// [`ProviderError::UnexpectedPayload`] when the response shape is off.
    #[instrument(skip(self), fields(repo = %self.full_name()))]
    pub async fn discussion_categories(&self) -> Result<Vec<DiscussionCategory>, ProviderError> {
        let query = format!(
            "repository(name: {name}, owner: {owner}) {{ discussionCategories(first: 25) {{ edges {{ node {{ name slug id }} }} }} }}",
            name = Value::from(self.name.as_str()),
            owner = Value::from(self.owner.as_str()),
        );
        let response = self.github.graphql_query(&query, false).await?;
        if let Some(errors) = response.get("errors") {
            return Err(ProviderError::graphql("discussionCategories", errors));
        }
        let edges = pluck(&response, &["data", "repository", "discussionCategories", "edges"])
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::unexpected("discussionCategories", response.to_string()))?;
        edges
            .iter()
            .map(|edge| {
                let node = edge.get("node").cloned().unwrap_or(Value::Null);
                serde_json::from_value(node)
                    .map_err(|e| ProviderError::unexpected("discussionCategories", e.to_string()))
            })
            .collect()
    }

    /// Applies repository settings.
    ///
    /// Returns the `PATCH` response, or an empty object when nothing needed
    /// patching. When discussions were toggled the result also carries
    /// `hasDiscussionsEnabled`.
    ///
    /// # Errors
    ///
    /// Returns the first failing call's error; earlier calls are not rolled back.
    #[instrument(skip(self, update), fields(repo = %self.full_name()))]
    pub async fn update(&self, update: &RepoUpdate) -> Result<Value, ProviderError> {
        let mut discussions = None;
        if let Some(enabled) = update.has_discussions {
            let input = json!({
                "hasDiscussionsEnabled": enabled,
                "repositoryId": self.node_id().await?,
            });
            let outcome = self
                .github
                .graphql_mutation(
                    "updateRepository",
                    "UpdateRepositoryInput",
                    input,
                    "repository {hasDiscussionsEnabled}",
                )
                .await?;
            match outcome {
                MutationOutcome::Data(data) => {
                    discussions = pluck(&data, &["repository", "hasDiscussionsEnabled"]).cloned();
                }
                MutationOutcome::Errors(errors) => {
                    return Err(ProviderError::graphql("updateRepository", &errors));
                }
            }
        }

        for (path, toggle) in [
            (
                "private-vulnerability-reporting",
                update.private_vulnerability_reporting,
            ),
            ("vulnerability-alerts", update.vulnerability_alerts),
            ("automated-security-fixes", update.automated_security_fixes),
        ] {
            if let Some(enabled) = toggle {
                let method = if enabled { Method::Put } else { Method::Delete };
                self.github
                    .call_empty(method, self.endpoint(path), None)
                    .await?;
            }
        }

        let url = self.url();
        let body = update.patch_body(&url)?;
        let mut output = if body.is_empty() {
            Value::Object(Map::new())
        } else {
            self.github
                .call(Method::Patch, url, Some(Value::Object(body)))
                .await?
        };
        if let (Some(enabled), Value::Object(map)) = (discussions, &mut output) {
            map.insert("hasDiscussionsEnabled".to_string(), enabled);
        }
        Ok(output)
    }

    /// Replaces all repository topics.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] for the first invalid topic,
    /// before any request is made.
    pub async fn topics_replace<S: AsRef<str>>(&self, topics: &[S]) -> Result<Value, ProviderError> {
        let names = topics
            .iter()
            .map(|topic| {
                validate::topic(topic.as_ref())?;
                Ok(topic.as_ref().to_string())
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;
        self.github
            .call(
                Method::Put,
                self.endpoint("topics"),
                Some(json!({ "names": names })),
            )
            .await
    }

    /// Default workflow permissions of the repository's `GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    pub async fn workflow_permissions(&self) -> Result<Value, ProviderError> {
        self.github
            .call(Method::Get, self.endpoint("actions/permissions/workflow"), None)
            .await
    }

    /// Sets default workflow permissions and whether Actions may approve pull requests.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Missing`] if both arguments are `None`.
    pub async fn workflow_permissions_set(
        &self,
        permissions: Option<WorkflowPermission>,
        can_approve_pull_requests: Option<bool>,
    ) -> Result<(), ProviderError> {
        let mut body = Map::new();
        if let Some(permissions) = permissions {
            body.insert("default_workflow_permissions".to_string(), json!(permissions));
        }
        if let Some(can_approve) = can_approve_pull_requests {
            body.insert(
                "can_approve_pull_request_reviews".to_string(),
                Value::Bool(can_approve),
            );
        }
        if body.is_empty() {
            return Err(ValidationError::missing(
                "at least one of permissions or can_approve_pull_requests",
            )
            .into());
        }
        self.github
            .call_empty(
                Method::Put,
                self.endpoint("actions/permissions/workflow"),
                Some(Value::Object(body)),
            )
            .await
    }
}

fn parse_semver(version: &str) -> Option<(u64, u64, u64)> {
    if !SEMVER.is_match(version) {
        return None;
    }
    let mut parts = version.split('.').map(str::parse::<u64>);
    Some((parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?))
}

fn file_entry(entry: &Value) -> Result<(Url, &str), ProviderError> {
    let download_url = entry
        .get("download_url")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::unexpected("content entry", "missing download_url"))?;
    let path = entry
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::unexpected("content entry", "missing path"))?;
    Ok((Url::parse(download_url)?, path))
}

fn file_name(repo_path: &str) -> String {
    repo_path
        .rsplit('/')
        .next()
        .unwrap_or(repo_path)
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::LinkConfig;
    use crate::http::HttpClient;

    fn repo() -> Repo {
        let http = HttpClient::new(&LinkConfig::offline()).unwrap();
        GitHub::new(http, None).unwrap().repo("octo", "hello")
    }

    #[test]
    fn test_repo_urls() {
        let repo = repo();
        assert_eq!(repo.url().to_string(), "https://api.github.com/repos/octo/hello");
        assert_eq!(
            repo.content_url("docs/", Some("main")).to_string(),
            "https://api.github.com/repos/octo/hello/contents/docs?ref=main"
        );
        assert_eq!(
            repo.content_url("", None).to_string(),
            "https://api.github.com/repos/octo/hello/contents"
        );
    }

    #[test]
    fn test_patch_body_skips_unset_and_groups_security() {
        let update = RepoUpdate {
            description: Some("demo".to_string()),
            visibility: Some(Visibility::Private),
            squash_merge_commit_title: Some(SquashMergeCommitTitle::CommitOrPrTitle),
            secret_scanning: Some(false),
            has_discussions: Some(true),
            vulnerability_alerts: Some(true),
            ..RepoUpdate::default()
        };
        let body = update.patch_body(&repo().url()).unwrap();
        assert_eq!(
            Value::Object(body),
            json!({
                "description": "demo",
                "visibility": "private",
                "squash_merge_commit_title": "COMMIT_OR_PR_TITLE",
                "security_and_analysis": {"secret_scanning": {"status": "disabled"}},
            })
        );
    }

    #[test]
    fn test_empty_update_has_empty_patch_body() {
        let update = RepoUpdate {
            automated_security_fixes: Some(true),
            ..RepoUpdate::default()
        };
        assert!(update.patch_body(&repo().url()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_semver() {
        assert_eq!(parse_semver("1.20.3"), Some((1, 20, 3)));
        assert_eq!(parse_semver("1.2"), None);
        assert_eq!(parse_semver("1.2.3-rc1"), None);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("docs/guide/index.md"), "index.md");
        assert_eq!(file_name("README.md"), "README.md");
    }
}
