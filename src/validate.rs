//! Argument validation performed before any network I/O.
//!
//! Each check returns a [`ValidationError`] naming the offending field and a
//! suggestion, the same way the URL and HTTP errors do.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Maximum length of a GitHub label description.
pub const MAX_LABEL_DESCRIPTION_LEN: usize = 100;

/// Maximum length of a GitHub repository topic.
pub const MAX_TOPIC_LEN: usize = 50;

/// Compiles a regex at static init; panics on invalid pattern.
pub(crate) fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"^[0-9a-fA-F]{6}$"));

static TOPIC_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"^[a-z0-9][a-z0-9\-]*$"));

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"^[A-Za-z0-9-]+$"));

static REPO_OR_BRANCH_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"^[A-Za-z0-9_.-]+$"));

// PEP 508 distribution names.
static DISTRIBUTION_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"(?i)^([A-Z0-9]|[A-Z0-9][A-Z0-9._-]*[A-Z0-9])$")
});

/// A structured argument failed a format constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The value does not match the field's format.
    #[error("invalid {field} '{value}': {reason}\n  Suggestion: {suggestion}")]
    Invalid {
        /// Argument name.
        field: &'static str,
        /// Rejected value.
        value: String,
        /// What is wrong with it.
        reason: String,
        /// How to fix it.
        suggestion: String,
    },

    /// The value exceeds the field's length limit.
    #[error("{field} must be {max} characters or less, got {actual}: '{value}'")]
    TooLong {
        /// Argument name.
        field: &'static str,
        /// Rejected value.
        value: String,
        /// Maximum allowed length.
        max: usize,
        /// Actual length.
        actual: usize,
    },

    /// A required combination of arguments is absent.
    #[error("missing argument: {reason}")]
    Missing {
        /// Which arguments are required.
        reason: String,
    },
}

impl ValidationError {
    /// Creates an `Invalid` error for a value that does not match `pattern`.
    #[must_use]
    pub fn pattern(field: &'static str, value: &str, reason: &str, suggestion: &str) -> Self {
        Self::Invalid {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
            suggestion: suggestion.to_string(),
        }
    }

    /// Creates a `TooLong` error.
    #[must_use]
    pub fn too_long(field: &'static str, value: &str, max: usize) -> Self {
        Self::TooLong {
            field,
            value: value.to_string(),
            max,
            actual: value.chars().count(),
        }
    }

    /// Creates a `Missing` error.
    #[must_use]
    pub fn missing(reason: impl Into<String>) -> Self {
        Self::Missing {
            reason: reason.into(),
        }
    }
}

/// Checks a label color: six hex digits, no leading `#`.
///
/// # Errors
///
/// Returns [`ValidationError::Invalid`] for any other format.
pub fn hex_color(color: &str) -> Result<(), ValidationError> {
    if HEX_COLOR_RE.is_match(color) {
        Ok(())
    } else {
        Err(ValidationError::pattern(
            "color",
            color,
            "the color must be a hexadecimal string of length 6",
            "Drop any leading '#', e.g. 'd73a4a'",
        ))
    }
}

/// Checks a label description length.
///
/// # Errors
///
/// Returns [`ValidationError::TooLong`] past [`MAX_LABEL_DESCRIPTION_LEN`] characters.
pub fn label_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > MAX_LABEL_DESCRIPTION_LEN {
        return Err(ValidationError::too_long(
            "description",
            description,
            MAX_LABEL_DESCRIPTION_LEN,
        ));
    }
    Ok(())
}

/// Checks a repository topic: lowercase alphanumerics and dashes, not
/// starting with a dash, at most [`MAX_TOPIC_LEN`] characters.
///
/// # Errors
///
/// Returns [`ValidationError::TooLong`] or [`ValidationError::Invalid`].
pub fn topic(topic: &str) -> Result<(), ValidationError> {
    if topic.chars().count() > MAX_TOPIC_LEN {
        return Err(ValidationError::too_long("topic", topic, MAX_TOPIC_LEN));
    }
    if !TOPIC_RE.is_match(topic) {
        return Err(ValidationError::pattern(
            "topic",
            topic,
            "topics contain only lowercase letters, digits and dashes, and cannot start with a dash",
            "Use a name like 'rust' or 'web-api'",
        ));
    }
    Ok(())
}

/// Checks a GitHub username.
///
/// # Errors
///
/// Returns [`ValidationError::Invalid`] for characters outside `A-Z a-z 0-9 -`.
pub fn github_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::pattern(
            "username",
            username,
            "GitHub usernames can only contain alphanumeric characters and dashes",
            "Check the account name on github.com",
        ))
    }
}

/// Checks a GitHub repository name.
///
/// # Errors
///
/// Returns [`ValidationError::Invalid`] for characters outside `A-Z a-z 0-9 _ . -`.
pub fn github_repo_name(name: &str) -> Result<(), ValidationError> {
    if REPO_OR_BRANCH_RE.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::pattern(
            "repository",
            name,
            "GitHub repository names can only contain '_', '-', '.' and alphanumeric characters",
            "Use the repository name as shown in its URL",
        ))
    }
}

/// Checks a GitHub branch name for web links.
///
/// # Errors
///
/// Returns [`ValidationError::Invalid`] for characters outside `A-Z a-z 0-9 _ . -`.
pub fn github_branch_name(name: &str) -> Result<(), ValidationError> {
    if REPO_OR_BRANCH_RE.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::pattern(
            "branch",
            name,
            "branch names can only contain '_', '-', '.' and alphanumeric characters",
            "Use a branch name without slashes or spaces",
        ))
    }
}

/// Checks a Python distribution name against PEP 508.
///
/// # Errors
///
/// Returns [`ValidationError::Invalid`] when the name does not match.
pub fn distribution_name(name: &str) -> Result<(), ValidationError> {
    if DISTRIBUTION_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::pattern(
            "distribution name",
            name,
            "distribution names start and end with a letter or digit and contain only letters, digits, '.', '_' and '-'",
            "See https://peps.python.org/pep-0508/#names",
        ))
    }
}

/// Checks that `value` is not empty or whitespace.
///
/// # Errors
///
/// Returns [`ValidationError::Invalid`] for blank input.
pub fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::pattern(
            field,
            value,
            "value is empty",
            "Provide a non-empty value",
        ));
    }
    Ok(())
}
