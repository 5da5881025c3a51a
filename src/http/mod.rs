//! Generic HTTP request function.
//!
//! A [`Request`] names a [`Url`](crate::link::Url), a [`Method`], headers, a
//! [`RequestBody`] and the [`ResponseKind`] the caller wants back.
//! [`HttpClient::send`] performs it and returns a [`Payload`] of that shape,
//! or an [`HttpError`] for non-2xx statuses, undecodable bodies and transport
//! failures. Nothing is retried or cached.

mod client;
mod error;
mod probe;
mod request;

pub use client::HttpClient;
pub use error::HttpError;
pub use probe::{DEFAULT_PROBE_TIMEOUT, Reachability};
pub use request::{Method, Payload, Request, RequestBody, ResponseKind};
