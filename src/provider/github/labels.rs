use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::Repo;
use crate::http::Method;
use crate::link::Url;
use crate::provider::ProviderError;
use crate::validate::{self, ValidationError};

/// Fields for [`Repo::label_update`]. At least one must be set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LabelUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    /// Six hex digits without `#`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LabelUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.new_name.is_none() && self.color.is_none() && self.description.is_none() {
            return Err(ValidationError::missing(
                "at least one of new_name, color or description",
            ));
        }
        check_label(self.color.as_deref(), self.description.as_deref())
    }
}

fn check_label(color: Option<&str>, description: Option<&str>) -> Result<(), ValidationError> {
    if let Some(color) = color {
        validate::hex_color(color)?;
    }
    if let Some(description) = description {
        validate::label_description(description)?;
    }
    Ok(())
}

impl Repo {
    fn label_url(&self, name: &str) -> Url {
        self.endpoint("labels").append_segment(name)
    }

    /// All repository labels, fetched 100 per page.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if any page fails.
    #[instrument(skip(self), fields(repo = %self.full_name()))]
    pub async fn labels(&self) -> Result<Vec<Value>, ProviderError> {
        self.github().paginate(&self.endpoint("labels"), None).await
    }

    /// Creates a label.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Validation`] for an empty name, a malformed
    /// color or a description over 100 characters.
    #[instrument(skip(self, description), fields(repo = %self.full_name()))]
    pub async fn label_create(
        &self,
        name: &str,
        color: Option<&str>,
        description: Option<&str>,
    ) -> Result<Value, ProviderError> {
        validate::non_empty("label name", name)?;
        check_label(color, description)?;
        let mut body = json!({ "name": name });
        if let Some(color) = color {
            body["color"] = json!(color);
        }
        if let Some(description) = description {
            body["description"] = json!(description);
        }
        self.github()
            .call(Method::Post, self.endpoint("labels"), Some(body))
            .await
    }

    /// Renames or restyles a label.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Missing`] when `update` is empty, and the
    /// same validation errors as [`label_create`](Self::label_create).
    #[instrument(skip(self, update), fields(repo = %self.full_name()))]
    pub async fn label_update(&self, name: &str, update: &LabelUpdate) -> Result<Value, ProviderError> {
        validate::non_empty("label name", name)?;
        update.validate()?;
        self.github()
            .call(Method::Patch, self.label_url(name), Some(json!(update)))
            .await
    }

    /// Deletes a label.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`]; 404 when the label does not exist.
    pub async fn label_delete(&self, name: &str) -> Result<(), ProviderError> {
        validate::non_empty("label name", name)?;
        self.github()
            .call_empty(Method::Delete, self.label_url(name), None)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_is_missing() {
        let err = LabelUpdate::default().validate().unwrap_err();
        assert!(matches!(err, ValidationError::Missing { .. }));
    }

    #[test]
    fn test_update_checks_color() {
        let update = LabelUpdate {
            color: Some("#ff0000".to_string()),
            ..LabelUpdate::default()
        };
        assert!(matches!(
            update.validate(),
            Err(ValidationError::Invalid { .. })
        ));
    }

    #[test]
    fn test_update_checks_description_length() {
        let update = LabelUpdate {
            description: Some("x".repeat(101)),
            ..LabelUpdate::default()
        };
        assert!(matches!(
            update.validate(),
            Err(ValidationError::TooLong { max: 100, .. })
        ));
    }
}
