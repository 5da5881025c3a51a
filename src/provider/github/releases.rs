use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::{Endpoint, Repo};
use crate::http::{Method, ResponseKind};
use crate::media_type::guess_from_extension;
use crate::provider::ProviderError;
use crate::validate::{self, ValidationError};

/// Whether a new release becomes the repository's latest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MakeLatest {
    #[default]
    True,
    False,
    /// Decided by creation date and semantic version.
    Legacy,
}

/// Body for [`Repo::release_create`].
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseCreate {
    pub tag_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Branch or SHA the tag is created from when it does not exist yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
    pub draft: bool,
    pub prerelease: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion_category_name: Option<String>,
    pub generate_release_notes: bool,
    pub make_latest: MakeLatest,
}

impl ReleaseCreate {
    /// A published, non-prerelease release for `tag_name`.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            name: None,
            body: None,
            target_commitish: None,
            draft: false,
            prerelease: false,
            discussion_category_name: None,
            generate_release_notes: false,
            make_latest: MakeLatest::default(),
        }
    }
}

impl Repo {
    /// Creates a release.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] for an empty tag name and
    /// [`ProviderError::Http`] on request failure.
    #[instrument(skip(self, release), fields(repo = %self.full_name(), tag = %release.tag_name))]
    pub async fn release_create(&self, release: &ReleaseCreate) -> Result<Value, ProviderError> {
        validate::non_empty("tag_name", &release.tag_name)?;
        self.github()
            .call(Method::Post, self.endpoint("releases"), Some(json!(release)))
            .await
    }

    /// Uploads a file as a release asset.
    ///
    /// `mime` defaults to a guess from the file extension; `label` is shown
    /// instead of the file name on GitHub.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Io`] if the file cannot be read
    /// - [`ValidationError::Missing`] if no MIME type is given or guessable
    /// - [`ProviderError::Http`] on request failure
    #[instrument(skip(self), fields(repo = %self.full_name()))]
    pub async fn release_asset_upload(
        &self,
        release_id: u64,
        path: &Path,
        mime: Option<&str>,
        label: Option<&str>,
    ) -> Result<Value, ProviderError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ValidationError::missing(format!("a file name in {}", path.display())))?
            .to_string();
        let content_type = match mime.filter(|m| !m.is_empty()) {
            Some(mime) => mime.to_string(),
            None => path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(guess_from_extension)
                .map(str::to_string)
                .ok_or_else(|| {
                    ValidationError::missing(format!(
                        "a MIME type for {file_name}; it could not be guessed from the extension"
                    ))
                })?,
        };
        let bytes = tokio::fs::read(path).await.map_err(|source| ProviderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut url = self
            .github()
            .rest_url(Endpoint::Upload, "repos")
            .append_path([self.owner(), self.name(), "releases"])
            .append_segment(release_id.to_string())
            .append_segment("assets")
            .with_query("name", &file_name);
        if let Some(label) = label.filter(|l| !l.is_empty()) {
            url = url.with_query("label", label);
        }

        let size = bytes.len();
        let request = self
            .github()
            .request(Method::Post, url)
            .header("Content-Type", content_type)
            .raw(bytes)
            .expect(ResponseKind::Json);
        let asset = self.github().send(request).await?.into_json().unwrap_or(Value::Null);
        info!(file = %file_name, size, "release asset uploaded");
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_create_body() {
        let release = ReleaseCreate {
            name: Some("v1.0.0".to_string()),
            make_latest: MakeLatest::Legacy,
            ..ReleaseCreate::new("v1.0.0")
        };
        assert_eq!(
            json!(release),
            json!({
                "tag_name": "v1.0.0",
                "name": "v1.0.0",
                "draft": false,
                "prerelease": false,
                "generate_release_notes": false,
                "make_latest": "legacy",
            })
        );
    }
}
