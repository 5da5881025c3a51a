//! URL object model: scheme, host, path segments, query and fragment.
//!
//! A [`Url`] is a value. Every combinator (`append_path`, `merge_query`,
//! `/`, ...) returns a new `Url` and leaves the receiver untouched, so a base
//! URL can be shared freely between provider clients.
//!
//! # Example
//!
//! ```
//! use weblinks::link::Url;
//!
//! let base = Url::parse("https://api.github.com")?;
//! let labels = (&base / "repos/owner/name/labels")
//!     .merge_query([("per_page", "100"), ("page", "1")]);
//! assert_eq!(
//!     labels.to_string(),
//!     "https://api.github.com/repos/owner/name/labels?per_page=100&page=1"
//! );
//! assert_eq!(base.to_string(), "https://api.github.com");
//! # Ok::<(), weblinks::link::UrlError>(())
//! ```

mod encode;
mod error;

pub use error::UrlError;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Div;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use encode::{FRAGMENT_SAFE, decode_lossless, encode_component};

/// Supported URL schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scheme {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    #[default]
    Https,
}

impl Scheme {
    /// Lowercase scheme name as it appears before `://`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An absolute http(s) URL decomposed into its structural parts.
///
/// Path segments, query keys/values and the fragment are stored decoded and
/// percent-encoded on output. Query keys keep the position of their first
/// insertion; writing an existing key replaces its value in place.
#[derive(Debug, Clone)]
pub struct Url {
    scheme: Scheme,
    host: String,
    path: Vec<String>,
    query: Vec<(String, String)>,
    fragment: Option<String>,
    query_safe: String,
}

impl Url {
    /// Parses an absolute `http://` or `https://` URL.
    ///
    /// A trailing slash, empty path segments and an empty query or fragment
    /// are dropped, so `https://example.com/` and `https://example.com` are
    /// the same value.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::Malformed`] when no scheme or host can be
    /// determined and [`UrlError::UnsupportedScheme`] for non-web schemes.
    pub fn parse(input: &str) -> Result<Self, UrlError> {
        let trimmed = input.trim();
        let parsed = url::Url::parse(trimmed).map_err(|e| UrlError::malformed(input, &e.to_string()))?;

        let scheme = match parsed.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => return Err(UrlError::unsupported_scheme(input, other)),
        };

        let host = match parsed.host_str() {
            Some(host) if !host.is_empty() => match parsed.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            },
            _ => return Err(UrlError::no_host(input)),
        };

        let path = parsed
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|segment| !segment.is_empty())
                    .map(|segment| decode_lossless(segment).into_owned())
                    .collect()
            })
            .unwrap_or_default();

        let mut url = Self {
            scheme,
            host,
            path,
            query: Vec::new(),
            fragment: None,
            query_safe: String::new(),
        };
        for (key, value) in parsed.query_pairs() {
            url.set_query_in_place(key.into_owned(), value.into_owned());
        }
        url.fragment = parsed
            .fragment()
            .filter(|fragment| !fragment.is_empty())
            .map(|fragment| decode_lossless(fragment).into_owned());

        trace!(url = %url, "parsed URL");
        Ok(url)
    }

    /// Builds a root URL from a scheme and host (optionally `host:port`).
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::Malformed`] when the host is empty or contains
    /// whitespace or URL delimiters.
    pub fn from_parts(scheme: Scheme, host: impl Into<String>) -> Result<Self, UrlError> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(UrlError::no_host(&host));
        }
        if host
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@' | '\\'))
        {
            return Err(UrlError::invalid_host(&host));
        }
        Ok(Self {
            scheme,
            host: host.to_ascii_lowercase(),
            path: Vec::new(),
            query: Vec::new(),
            fragment: None,
            query_safe: String::new(),
        })
    }

    /// Builds a root `https://` URL for `host`.
    ///
    /// # Errors
    ///
    /// See [`Url::from_parts`].
    pub fn https(host: impl Into<String>) -> Result<Self, UrlError> {
        Self::from_parts(Scheme::Https, host)
    }

    /// URL scheme.
    #[must_use]
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Host, including `:port` when one was given.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Decoded path segments.
    #[must_use]
    pub fn path_segments(&self) -> &[String] {
        &self.path
    }

    /// Last path segment, if any.
    #[must_use]
    pub fn last_segment(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Decoded query pairs in serialization order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Value of a query key.
    #[must_use]
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Decoded fragment.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Returns a copy with one segment appended.
    ///
    /// The segment is stored decoded: existing `%XX` escapes are honored and
    /// any `/` is encoded as `%2F` on output. An empty segment is dropped.
    #[must_use]
    pub fn append_segment(&self, segment: impl AsRef<str>) -> Self {
        self.append_path([segment])
    }

    /// Returns a copy with `segments` appended in order; empty segments are dropped.
    ///
    /// Dot segments are resolved the way a browser resolves them: `"."` is
    /// dropped and `".."` removes the previous segment (a no-op at the root).
    /// Encoded forms such as `%2E%2E` count as dot segments too, so the
    /// printed URL always parses back to the same value.
    #[must_use]
    pub fn append_path<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.clone();
        for segment in segments {
            let segment = segment.as_ref();
            if segment.is_empty() {
                continue;
            }
            let decoded = decode_lossless(segment);
            match &*decoded {
                "." => {}
                ".." => {
                    url.path.pop();
                }
                other => url.path.push(other.to_string()),
            }
        }
        url
    }

    /// Returns a copy with a slash-separated relative path appended.
    ///
    /// `"a/b"`, `"/a/b/"` and `"a//b"` all append the segments `a` and `b`.
    #[must_use]
    pub fn join(&self, path: &str) -> Self {
        self.append_path(path.split('/'))
    }

    /// Returns a copy with `pairs` written into the query.
    ///
    /// Existing keys are overwritten in place; new keys are appended; keys not
    /// mentioned are preserved.
    #[must_use]
    pub fn merge_query<I, K, V>(&self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut url = self.clone();
        for (key, value) in pairs {
            url.set_query_in_place(key.into(), value.into());
        }
        url
    }

    /// Returns a copy with a single query pair written.
    #[must_use]
    pub fn with_query(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.merge_query([(key.into(), value.into())])
    }

    /// Returns a copy with `key` removed from the query.
    #[must_use]
    pub fn without_query(&self, key: &str) -> Self {
        let mut url = self.clone();
        url.query.retain(|(k, _)| k != key);
        url
    }

    /// Returns a copy with the fragment replaced; `None` or `""` removes it.
    #[must_use]
    pub fn with_fragment<S: Into<String>>(&self, fragment: Option<S>) -> Self {
        let mut url = self.clone();
        url.fragment = fragment.map(Into::into).filter(|f| !f.is_empty());
        url
    }

    /// Returns a copy whose query values leave the characters in `safe` unencoded.
    ///
    /// GitHub web search strings use this to keep `+` as a term separator.
    ///
    /// Such a URL does not survive a print/parse round trip: parsing decodes
    /// a bare `+` in the query as a space, and the safe set itself is not
    /// part of the printed form.
    #[must_use]
    pub fn with_query_safe(&self, safe: impl Into<String>) -> Self {
        let mut url = self.clone();
        url.query_safe = safe.into();
        url
    }

    /// The URL without query and fragment, e.g. `https://example.com/index`.
    #[must_use]
    pub fn base(&self) -> String {
        let mut out = format!("{}://{}", self.scheme, self.host);
        for segment in &self.path {
            out.push('/');
            out.push_str(&encode_component(segment, ""));
        }
        out
    }

    /// The encoded query string without the leading `?`, or `None` when empty.
    #[must_use]
    pub fn query_string(&self) -> Option<String> {
        if self.query.is_empty() {
            return None;
        }
        let joined = self
            .query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    encode_component(key, ""),
                    encode_component(value, &self.query_safe)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        Some(joined)
    }

    /// Converts to a [`url::Url`] for handing to the HTTP layer.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::Malformed`] if the canonical form is rejected by
    /// the `url` crate (for example an invalid port).
    pub fn to_parsed(&self) -> Result<url::Url, UrlError> {
        let canonical = self.to_string();
        url::Url::parse(&canonical).map_err(|e| UrlError::malformed(&canonical, &e.to_string()))
    }

    fn set_query_in_place(&mut self, key: String, value: String) {
        if let Some(slot) = self.query.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.query.push((key, value));
        }
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base())?;
        if let Some(query) = self.query_string() {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", encode_component(fragment, FRAGMENT_SAFE))?;
        }
        Ok(())
    }
}

impl PartialEq for Url {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Url {}

impl Hash for Url {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl FromStr for Url {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Url {
    type Error = UrlError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl<S: AsRef<str>> Div<S> for &Url {
    type Output = Url;

    fn div(self, path: S) -> Url {
        self.join(path.as_ref())
    }
}

impl<S: AsRef<str>> Div<S> for Url {
    type Output = Url;

    fn div(self, path: S) -> Url {
        self.join(path.as_ref())
    }
}

impl Serialize for Url {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Url {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
