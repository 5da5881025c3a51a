//! weblinks: URL building and typed web API clients
//!
//! The core is [`Url`], an immutable URL value with path, query and fragment
//! combinators. Around it sit a thin HTTP layer with typed response decoding,
//! a page-index pagination helper and provider clients that compose URLs and
//! reshape responses.
//!
//! # Architecture
//!
//! - [`link`] - URL model, parsing and canonical serialization
//! - [`http`] - request/response types, client and reachability probe
//! - [`pagination`] - page-index list fetching
//! - [`provider`] - GitHub, DOI, PyPI, Conda and Read the Docs clients
//! - [`download`] - streaming file download
//! - [`media_type`], [`data_uri`] - media type and `data:` URI handling
//! - [`validate`] - name and pattern checks shared by providers
//! - [`config`] - offline flag, timeouts and user agent

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod data_uri;
pub mod download;
pub mod http;
pub mod link;
pub mod media_type;
pub mod pagination;
pub mod provider;
mod user_agent;
pub mod validate;

// Re-export commonly used types
pub use config::LinkConfig;
pub use data_uri::{DataUri, DataUriError};
pub use download::{DownloadError, DownloadOptions, DownloadedFile, download_to_path};
pub use http::{
    DEFAULT_PROBE_TIMEOUT, HttpClient, HttpError, Method, Payload, Reachability, Request,
    RequestBody, ResponseKind,
};
pub use link::{Scheme, Url, UrlError};
pub use media_type::{MediaType, MediaTypeError};
pub use pagination::{DEFAULT_PAGE_SIZE, PageRequest, Paginator};
pub use provider::ProviderError;
pub use validate::ValidationError;
