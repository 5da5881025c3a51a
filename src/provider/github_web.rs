//! Links to pages on github.com.
//!
//! Construction validates names locally and never touches the network.
//! Call `verify` to confirm a page exists; it is skipped in offline mode.

use crate::http::HttpClient;
use crate::link::Url;
use crate::provider::{ProviderError, verify_reachable};
use crate::validate;

/// Web host used by every link in this module.
pub const WEB_BASE_URL: &str = "https://github.com";

/// State filter for [`WebRepo::milestones`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MilestoneState {
    #[default]
    Open,
    Closed,
}

/// Which release page [`WebRepo::releases`] links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseTag<'a> {
    /// The release list.
    All,
    /// The latest release.
    Latest,
    /// A specific tag.
    Tag(&'a str),
}

/// A GitHub user profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebUser {
    name: String,
    url: Url,
}

impl WebUser {
    /// Validates `username` and builds its profile URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] for characters outside
    /// alphanumerics and `-`.
    pub fn new(username: &str) -> Result<Self, ProviderError> {
        validate::github_username(username)?;
        let url = Url::parse(WEB_BASE_URL)?.append_segment(username);
        Ok(Self {
            name: username.to_string(),
            url,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `https://github.com/{username}`
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// A repository of this user.
    ///
    /// # Errors
    ///
    /// See [`WebRepo::new`].
    pub fn repo(&self, name: &str) -> Result<WebRepo, ProviderError> {
        WebRepo::new(self.clone(), name)
    }

    /// Confirms the profile page exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unreachable`] when the probe fails.
    pub async fn verify(&self, http: &HttpClient) -> Result<(), ProviderError> {
        verify_reachable(http, &self.url).await
    }
}

/// A GitHub repository page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebRepo {
    user: WebUser,
    name: String,
    url: Url,
}

impl WebRepo {
    /// Validates the repository name and builds its URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] for characters outside
    /// alphanumerics, `_`, `.` and `-`.
    pub fn new(user: WebUser, name: &str) -> Result<Self, ProviderError> {
        validate::github_repo_name(name)?;
        let url = user.url().append_segment(name);
        Ok(Self {
            user,
            name: name.to_string(),
            url,
        })
    }

    /// Builds a repository link from an owner login and repository name.
    ///
    /// # Errors
    ///
    /// See [`WebUser::new`] and [`WebRepo::new`].
    pub fn from_names(owner: &str, name: &str) -> Result<Self, ProviderError> {
        WebUser::new(owner)?.repo(name)
    }

    #[must_use]
    pub fn user(&self) -> &WebUser {
        &self.user
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `https://github.com/{owner}/{repo}`
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Page of a workflow, e.g. `ci.yaml`.
    #[must_use]
    pub fn workflow(&self, filename: &str) -> Url {
        self.url.append_path(["actions", "workflows", filename])
    }

    /// Pull request or issue list, optionally filtered by state and label.
    ///
    /// Filters become a search query such as `q=is:pr+is:open+label:bug`
    /// with `+` kept literal.
    #[must_use]
    pub fn pr_issues(&self, pr: bool, closed: Option<bool>, label: Option<&str>) -> Url {
        let url = self.url.append_segment(if pr { "pulls" } else { "issues" });
        if closed.is_none() && label.is_none() {
            return url;
        }
        let mut terms = vec![if pr { "is:pr".to_string() } else { "is:issue".to_string() }];
        if let Some(closed) = closed {
            terms.push(format!("is:{}", if closed { "closed" } else { "open" }));
        }
        if let Some(label) = label {
            terms.push(format!("label:{label}"));
        }
        url.with_query("q", terms.join("+")).with_query_safe("+")
    }

    /// Release list, latest release or a tagged release.
    #[must_use]
    pub fn releases(&self, tag: ReleaseTag<'_>) -> Url {
        let url = self.url.append_segment("releases");
        match tag {
            ReleaseTag::All | ReleaseTag::Tag("") => url,
            ReleaseTag::Latest => url.append_segment("latest"),
            ReleaseTag::Tag(tag) => url.append_path(["tag", tag]),
        }
    }

    /// Commit history of the default branch.
    #[must_use]
    pub fn commits(&self) -> Url {
        self.url.append_segment("commits")
    }

    /// Discussions, optionally narrowed to a category slug.
    #[must_use]
    pub fn discussions(&self, category: Option<&str>) -> Url {
        let url = self.url.append_segment("discussions");
        match category {
            Some(category) if !category.is_empty() => url.append_path(["categories", category]),
            _ => url,
        }
    }

    /// Milestones in the given state.
    #[must_use]
    pub fn milestones(&self, state: MilestoneState) -> Url {
        let state = match state {
            MilestoneState::Open => "open",
            MilestoneState::Closed => "closed",
        };
        self.url.append_segment("milestones").with_query("state", state)
    }

    /// A branch of this repository.
    ///
    /// # Errors
    ///
    /// See [`WebBranch::new`].
    pub fn branch(&self, name: &str) -> Result<WebBranch, ProviderError> {
        WebBranch::new(self.clone(), name)
    }

    /// Confirms the repository page exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unreachable`] when the probe fails.
    pub async fn verify(&self, http: &HttpClient) -> Result<(), ProviderError> {
        verify_reachable(http, &self.url).await
    }
}

/// A branch tree page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebBranch {
    repo: WebRepo,
    name: String,
    url: Url,
}

impl WebBranch {
    /// Validates the branch name and builds its tree URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] for characters outside
    /// alphanumerics, `_`, `.` and `-`.
    pub fn new(repo: WebRepo, name: &str) -> Result<Self, ProviderError> {
        validate::github_branch_name(name)?;
        let url = repo.url().append_path(["tree", name]);
        Ok(Self {
            repo,
            name: name.to_string(),
            url,
        })
    }

    #[must_use]
    pub fn repo(&self) -> &WebRepo {
        &self.repo
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `https://github.com/{owner}/{repo}/tree/{branch}`
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Workflow runs on this branch.
    #[must_use]
    pub fn workflow(&self, filename: &str) -> Url {
        self.repo
            .workflow(filename)
            .with_query("query", format!("branch:{}", self.name))
    }

    /// A file or directory on this branch; `path` may contain `/`.
    #[must_use]
    pub fn file(&self, path: &str) -> Url {
        self.url.join(path)
    }

    /// Commit history of this branch.
    #[must_use]
    pub fn commits(&self) -> Url {
        self.repo.url().append_path(["commits", self.name.as_str()])
    }

    /// Confirms the branch page exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unreachable`] when the probe fails.
    pub async fn verify(&self, http: &HttpClient) -> Result<(), ProviderError> {
        verify_reachable(http, &self.url).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn repo() -> WebRepo {
        WebRepo::from_names("repodynamics", "pylinks").unwrap()
    }

    #[test]
    fn test_user_and_repo_urls() {
        let user = WebUser::new("octo-cat").unwrap();
        assert_eq!(user.url().to_string(), "https://github.com/octo-cat");
        assert_eq!(
            repo().url().to_string(),
            "https://github.com/repodynamics/pylinks"
        );
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert!(WebUser::new("bad name").is_err());
        assert!(WebRepo::from_names("octo", "bad/name").is_err());
        assert!(repo().branch("feature/x").is_err());
    }

    #[test]
    fn test_pr_issues_query() {
        let repo = repo();
        assert_eq!(
            repo.pr_issues(true, None, None).to_string(),
            "https://github.com/repodynamics/pylinks/pulls"
        );
        assert_eq!(
            repo.pr_issues(true, Some(false), Some("bug")).to_string(),
            "https://github.com/repodynamics/pylinks/pulls?q=is%3Apr+is%3Aopen+label%3Abug"
        );
        assert_eq!(
            repo.pr_issues(false, Some(true), None).to_string(),
            "https://github.com/repodynamics/pylinks/issues?q=is%3Aissue+is%3Aclosed"
        );
    }

    #[test]
    fn test_releases() {
        let repo = repo();
        let base = "https://github.com/repodynamics/pylinks/releases";
        assert_eq!(repo.releases(ReleaseTag::All).to_string(), base);
        assert_eq!(repo.releases(ReleaseTag::Latest).to_string(), format!("{base}/latest"));
        assert_eq!(
            repo.releases(ReleaseTag::Tag("v1.0.0")).to_string(),
            format!("{base}/tag/v1.0.0")
        );
    }

    #[test]
    fn test_repo_pages() {
        let repo = repo();
        assert_eq!(
            repo.workflow("ci.yaml").to_string(),
            "https://github.com/repodynamics/pylinks/actions/workflows/ci.yaml"
        );
        assert_eq!(
            repo.discussions(Some("ideas")).to_string(),
            "https://github.com/repodynamics/pylinks/discussions/categories/ideas"
        );
        assert_eq!(
            repo.milestones(MilestoneState::Closed).to_string(),
            "https://github.com/repodynamics/pylinks/milestones?state=closed"
        );
    }

    #[test]
    fn test_branch_urls() {
        let branch = repo().branch("dev").unwrap();
        assert_eq!(
            branch.url().to_string(),
            "https://github.com/repodynamics/pylinks/tree/dev"
        );
        assert_eq!(
            branch.file("docs/index.md").to_string(),
            "https://github.com/repodynamics/pylinks/tree/dev/docs/index.md"
        );
        assert_eq!(
            branch.commits().to_string(),
            "https://github.com/repodynamics/pylinks/commits/dev"
        );
        assert_eq!(
            branch.workflow("ci.yaml").to_string(),
            "https://github.com/repodynamics/pylinks/actions/workflows/ci.yaml?query=branch%3Adev"
        );
    }
}
