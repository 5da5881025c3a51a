use serde_json::{Map, Value, json};
use tracing::instrument;

use super::Repo;
use crate::http::Method;
use crate::provider::ProviderError;
use crate::validate;

/// Source directory of a legacy Pages build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PagesPath {
    #[default]
    Root,
    Docs,
}

impl PagesPath {
    fn as_str(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Docs => "/docs",
        }
    }
}

/// How the Pages site is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagesBuild {
    /// Built from a branch by GitHub.
    Legacy { branch: String, path: PagesPath },
    /// Built by a custom Actions workflow.
    Workflow,
}

impl PagesBuild {
    fn write_into(&self, body: &mut Map<String, Value>) -> Result<(), ProviderError> {
        match self {
            Self::Legacy { branch, path } => {
                validate::non_empty("branch", branch)?;
                body.insert("build_type".to_string(), json!("legacy"));
                body.insert(
                    "source".to_string(),
                    json!({ "branch": branch, "path": path.as_str() }),
                );
            }
            Self::Workflow => {
                body.insert("build_type".to_string(), json!("workflow"));
            }
        }
        Ok(())
    }
}

/// Fields for [`Repo::pages_update`]. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct PagesUpdate {
    /// Custom domain; an empty string removes it.
    pub cname: Option<String>,
    pub https_enforced: Option<bool>,
    pub build: Option<PagesBuild>,
}

impl Repo {
    /// Enables GitHub Pages.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] for a legacy build without a branch.
    #[instrument(skip(self), fields(repo = %self.full_name()))]
    pub async fn pages_create(&self, build: &PagesBuild) -> Result<Value, ProviderError> {
        let mut body = Map::new();
        build.write_into(&mut body)?;
        self.github()
            .call(Method::Post, self.endpoint("pages"), Some(Value::Object(body)))
            .await
    }

    /// Updates Pages settings.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] for a legacy build without a branch.
    #[instrument(skip(self, update), fields(repo = %self.full_name()))]
    pub async fn pages_update(&self, update: &PagesUpdate) -> Result<(), ProviderError> {
        let mut body = Map::new();
        if let Some(cname) = &update.cname {
            let value = if cname.is_empty() {
                Value::Null
            } else {
                json!(cname)
            };
            body.insert("cname".to_string(), value);
        }
        if let Some(https) = update.https_enforced {
            body.insert("https_enforced".to_string(), json!(https));
        }
        if let Some(build) = &update.build {
            build.write_into(&mut body)?;
        }
        self.github()
            .call_empty(Method::Put, self.endpoint("pages"), Some(Value::Object(body)))
            .await
    }

    /// Disables GitHub Pages.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on request failure.
    pub async fn pages_delete(&self) -> Result<(), ProviderError> {
        self.github()
            .call_empty(Method::Delete, self.endpoint("pages"), None)
            .await
    }
}
