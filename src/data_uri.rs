//! `data:` URIs (RFC 2397).

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use thiserror::Error;

use crate::media_type::{MediaType, MediaTypeError};
use crate::validate::compile_static_regex;

static DATA_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"(?s)^data:(?P<media_type>.*?)(?P<base64>\s*;\s*base64)?\s*,(?P<data>.*)$")
});

/// Errors raised while parsing or decoding a data URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUriError {
    /// The input is not of the form `data:[<media type>][;base64],<data>`.
    #[error("failed to parse data URI '{input}': expected data:[<media type>][;base64],<data>")]
    Malformed {
        /// The rejected input.
        input: String,
    },

    /// The media type part is invalid.
    #[error(transparent)]
    MediaType(#[from] MediaTypeError),

    /// The payload is flagged as base64 but does not decode.
    #[error("invalid base64 payload in data URI: {reason}")]
    Base64 {
        /// Decoder message.
        reason: String,
    },
}

/// A parsed data URI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataUri {
    /// Media type; `None` means the RFC default `text/plain;charset=US-ASCII`.
    pub media_type: Option<MediaType>,
    /// Payload exactly as it appears after the comma.
    pub data: String,
    /// Whether `data` is base64-encoded.
    pub base64: bool,
}

impl DataUri {
    /// Builds a data URI from raw bytes, base64-encoding them when `base64` is set.
    ///
    /// Without base64 the payload is percent-encoded.
    #[must_use]
    pub fn create(media_type: Option<MediaType>, data: &[u8], base64: bool) -> Self {
        let data = if base64 {
            STANDARD.encode(data)
        } else {
            urlencoding::encode_binary(data).into_owned()
        };
        Self {
            media_type,
            data,
            base64,
        }
    }

    /// Parses a `data:` URI.
    ///
    /// # Errors
    ///
    /// Returns [`DataUriError::Malformed`] for non-data URIs and
    /// [`DataUriError::MediaType`] for an invalid media type.
    pub fn parse(input: &str) -> Result<Self, DataUriError> {
        let caps = DATA_URI_RE
            .captures(input.trim_start())
            .ok_or_else(|| DataUriError::Malformed {
                input: input.to_string(),
            })?;
        let media_type = caps
            .name("media_type")
            .map(|m| m.as_str().trim())
            .filter(|m| !m.is_empty())
            .map(MediaType::parse)
            .transpose()?;
        Ok(Self {
            media_type,
            data: caps
                .name("data")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            base64: caps.name("base64").is_some(),
        })
    }

    /// Decodes the payload into bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DataUriError::Base64`] when a base64 payload is invalid.
    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        if self.base64 {
            STANDARD
                .decode(self.data.trim())
                .map_err(|e| DataUriError::Base64 {
                    reason: e.to_string(),
                })
        } else {
            Ok(urlencoding::decode_binary(self.data.as_bytes()).into_owned())
        }
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("data:")?;
        if let Some(media_type) = &self.media_type {
            write!(f, "{media_type}")?;
        }
        if self.base64 {
            f.write_str(";base64")?;
        }
        write!(f, ",{}", self.data)
    }
}

impl FromStr for DataUri {
    type Err = DataUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base64_uri() {
        let uri = DataUri::parse("data:text/plain;charset=UTF-8;base64,SGVsbG8=").unwrap();
        let media_type = uri.media_type.as_ref().unwrap();
        assert_eq!(media_type.essence(), "text/plain");
        assert_eq!(media_type.parameter("charset"), Some("UTF-8"));
        assert!(uri.base64);
        assert_eq!(uri.decode().unwrap(), b"Hello");
    }

    #[test]
    fn test_parse_without_media_type() {
        let uri = DataUri::parse("data:,Hello%2C%20World").unwrap();
        assert!(uri.media_type.is_none());
        assert!(!uri.base64);
        assert_eq!(uri.decode().unwrap(), b"Hello, World");
        assert_eq!(uri.to_string(), "data:,Hello%2C%20World");
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        assert!(matches!(
            DataUri::parse("https://example.com"),
            Err(DataUriError::Malformed { .. })
        ));
        assert!(matches!(
            DataUri::parse("data:text/plain"),
            Err(DataUriError::Malformed { .. })
        ));
        assert!(matches!(
            DataUri::parse("data:nonsense,abc"),
            Err(DataUriError::MediaType(_))
        ));
    }

    #[test]
    fn test_create_base64() {
        let uri = DataUri::create(Some(MediaType::new("image", "svg+xml")), b"<svg/>", true);
        assert_eq!(uri.to_string(), "data:image/svg+xml;base64,PHN2Zy8+");
        let back: DataUri = uri.to_string().parse().unwrap();
        assert_eq!(back.decode().unwrap(), b"<svg/>");
    }

    #[test]
    fn test_create_percent_encoded() {
        let uri = DataUri::create(None, b"a b", false);
        assert_eq!(uri.to_string(), "data:,a%20b");
    }

    #[test]
    fn test_invalid_base64_payload() {
        let uri = DataUri::parse("data:;base64,***").unwrap();
        assert!(matches!(uri.decode(), Err(DataUriError::Base64 { .. })));
    }
}
