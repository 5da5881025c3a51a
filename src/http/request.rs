//! Request description: target, verb, headers, body and expected response shape.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::HttpError;
use crate::link::Url;

/// HTTP verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// `GET`
    #[default]
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `OPTIONS`
    Options,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case verb name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Options => "OPTIONS",
            Self::Delete => "DELETE",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Options => reqwest::Method::OPTIONS,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape the response body is decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
    /// Parse the body as JSON.
    #[default]
    Json,
    /// Decode the body as text.
    Text,
    /// Return the raw body.
    Bytes,
    /// Discard the body.
    Empty,
}

impl ResponseKind {
    /// Lowercase name used in log fields and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Empty => "empty",
        }
    }
}

/// Request body. The variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Raw bytes; the caller sets `Content-Type`.
    Raw(Vec<u8>),
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
    /// JSON document.
    Json(Value),
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Parsed JSON.
    Json(Value),
    /// Decoded text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Body was discarded.
    Empty,
}

impl Payload {
    /// Returns the JSON value, if this is a JSON payload.
    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the text, if this is a text payload.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the bytes, if this is a bytes payload.
    #[must_use]
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// A fully described HTTP request.
///
/// ```
/// use weblinks::http::{Method, Request, ResponseKind};
/// use weblinks::link::Url;
///
/// let url = Url::parse("https://api.github.com/repos/o/r/labels")?;
/// let request = Request::new(Method::Post, url)
///     .header("Accept", "application/vnd.github+json")
///     .json(serde_json::json!({"name": "bug", "color": "d73a4a"}))
///     .expect(ResponseKind::Json);
/// assert_eq!(request.method(), Method::Post);
/// # Ok::<(), weblinks::link::UrlError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) url: Url,
    pub(crate) method: Method,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: RequestBody,
    pub(crate) expect: ResponseKind,
    pub(crate) encoding: Option<String>,
    pub(crate) timeout: Option<Duration>,
}

impl Request {
    /// Creates a request expecting a JSON response.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            url,
            method,
            headers: Vec::new(),
            body: RequestBody::Empty,
            expect: ResponseKind::Json,
            encoding: None,
            timeout: None,
        }
    }

    /// Creates a `GET` request expecting a JSON response.
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    /// Adds a header. Later headers with the same name are sent as well.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, value: Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    /// Serializes `value` into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Encode`] if `value` cannot be represented as JSON.
    pub fn json_from<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, HttpError> {
        let value = serde_json::to_value(value)
            .map_err(|e| HttpError::encode(self.url.to_string(), e.to_string()))?;
        Ok(self.json(value))
    }

    /// Sets a form-encoded body.
    #[must_use]
    pub fn form<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Sets a raw body.
    #[must_use]
    pub fn raw(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.body = RequestBody::Raw(bytes.into());
        self
    }

    /// Sets the expected response shape.
    #[must_use]
    pub fn expect(mut self, kind: ResponseKind) -> Self {
        self.expect = kind;
        self
    }

    /// Forces the text encoding used for [`ResponseKind::Text`] decoding.
    ///
    /// Supported labels are `utf-8` and `latin-1` (`iso-8859-1`); without an
    /// override the response `Content-Type` charset is honored.
    #[must_use]
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Overrides the client read timeout for this request.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// HTTP verb.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Request body.
    #[must_use]
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Expected response shape.
    #[must_use]
    pub fn expected(&self) -> ResponseKind {
        self.expect
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://example.com/api").unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let request = Request::get(url());
        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.expected(), ResponseKind::Json);
        assert_eq!(request.body(), &RequestBody::Empty);
        assert!(request.headers().is_empty());
        assert!(request.timeout.is_none());
    }

    #[test]
    fn test_body_setters_replace_each_other() {
        let request = Request::new(Method::Post, url())
            .form([("a", "1")])
            .json(serde_json::json!({"b": 2}));
        assert_eq!(
            request.body(),
            &RequestBody::Json(serde_json::json!({"b": 2}))
        );
        let request = request.raw(b"bytes".to_vec());
        assert_eq!(request.body(), &RequestBody::Raw(b"bytes".to_vec()));
    }

    #[test]
    fn test_json_from_serializes_struct() {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            color: Option<&'a str>,
        }
        let request = Request::new(Method::Patch, url())
            .json_from(&Body {
                name: "bug",
                color: None,
            })
            .unwrap();
        assert_eq!(
            request.body(),
            &RequestBody::Json(serde_json::json!({"name": "bug"}))
        );
    }

    #[test]
    fn test_method_names() {
        assert_eq!(Method::Options.to_string(), "OPTIONS");
        assert_eq!(Method::Delete.to_reqwest(), reqwest::Method::DELETE);
    }

    #[test]
    fn test_payload_accessors() {
        assert_eq!(
            Payload::Text("hi".into()).into_text().as_deref(),
            Some("hi")
        );
        assert!(Payload::Empty.into_json().is_none());
        assert_eq!(Payload::Bytes(vec![1]).into_bytes(), Some(vec![1]));
    }
}
