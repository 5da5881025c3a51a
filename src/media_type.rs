//! Media types (MIME types): `type "/" [tree "."] subtype ["+" suffix]* [";" parameter]*`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::validate::compile_static_regex;

const MEDIA_TYPE_PATTERN: &str = r"^(?P<type>[\w\-]+)/(?:(?P<tree>[\w\-]+)\.)?(?P<subtype>[\w\-.]+)(?P<suffixes>(?:\+[\w\-.]+)*)(?:\s*;\s*(?P<parameters>.*))?$";

static MEDIA_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(MEDIA_TYPE_PATTERN));

/// A media type string did not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse media type '{input}': expected type/[tree.]subtype[+suffix][; param=value]")]
pub struct MediaTypeError {
    /// The rejected input.
    pub input: String,
}

/// A parsed media type such as `application/vnd.api+json; charset=utf-8`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaType {
    /// Top-level type, e.g. `application`.
    pub kind: String,
    /// Registration tree, e.g. `vnd`; empty for the standards tree.
    pub tree: String,
    /// Subtype without tree prefix and suffixes.
    pub subtype: String,
    /// Structured syntax suffixes, e.g. `["json"]`.
    pub suffixes: Vec<String>,
    /// Parameters in order of appearance; valueless parameters map to `None`.
    pub parameters: Vec<(String, Option<String>)>,
}

impl MediaType {
    /// Creates a media type with no tree, suffixes or parameters.
    #[must_use]
    pub fn new(kind: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            subtype: subtype.into(),
            ..Self::default()
        }
    }

    /// Parses a media type string.
    ///
    /// # Errors
    ///
    /// Returns [`MediaTypeError`] when the input does not match the grammar.
    pub fn parse(input: &str) -> Result<Self, MediaTypeError> {
        let caps = MEDIA_TYPE_RE
            .captures(input.trim())
            .ok_or_else(|| MediaTypeError {
                input: input.to_string(),
            })?;
        let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());

        let suffixes = group("suffixes")
            .split('+')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let parameters = group("parameters")
            .split(';')
            .map(str::trim)
            .filter(|param| !param.is_empty())
            .map(|param| match param.split_once('=') {
                Some((key, value)) => (key.trim().to_string(), Some(value.trim().to_string())),
                None => (param.to_string(), None),
            })
            .collect();

        Ok(Self {
            kind: group("type").to_string(),
            tree: group("tree").to_string(),
            subtype: group("subtype").to_string(),
            suffixes,
            parameters,
        })
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.parameters.push((key.into(), value));
        self
    }

    /// `type/[tree.]subtype[+suffix...]` without parameters.
    #[must_use]
    pub fn essence(&self) -> String {
        let mut out = format!("{}/", self.kind);
        if !self.tree.is_empty() {
            out.push_str(&self.tree);
            out.push('.');
        }
        out.push_str(&self.subtype);
        for suffix in &self.suffixes {
            out.push('+');
            out.push_str(suffix);
        }
        out
    }

    /// Value of a parameter, matched case-insensitively.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .and_then(|(_, v)| v.as_deref())
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.essence())?;
        for (key, value) in &self.parameters {
            match value {
                Some(value) => write!(f, "; {key}={value}")?,
                None => write!(f, "; {key}")?,
            }
        }
        Ok(())
    }
}

impl FromStr for MediaType {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Guesses a media type from a file extension; `None` for unknown extensions.
#[must_use]
pub fn guess_from_extension(extension: &str) -> Option<&'static str> {
    let mime = match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "txt" | "text" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "yaml" | "yml" => "application/yaml",
        "toml" => "application/toml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "tgz" => "application/gzip",
        "tar" => "application/x-tar",
        "bz2" => "application/x-bzip2",
        "xz" => "application/x-xz",
        "whl" => "application/zip",
        "wasm" => "application/wasm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/vnd.microsoft.icon",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        "woff2" => "font/woff2",
        _ => return None,
    };
    Some(mime)
}
