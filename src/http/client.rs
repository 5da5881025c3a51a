//! `HttpClient`: the single request function every provider goes through.

use std::panic::{AssertUnwindSafe, catch_unwind, set_hook, take_hook};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, Proxy};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace, warn};

use super::error::HttpError;
use super::request::{Payload, Request, RequestBody, ResponseKind};
use crate::config::LinkConfig;
use crate::user_agent;

/// HTTP client carrying the caller's [`LinkConfig`].
///
/// Cloning is cheap; clones share the connection pool.
///
/// # Example
///
/// ```no_run
/// use weblinks::config::LinkConfig;
/// use weblinks::http::{HttpClient, Request};
/// use weblinks::link::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new(&LinkConfig::default())?;
/// let url = Url::parse("https://pypi.org/pypi/requests/json")?;
/// let info: serde_json::Value = client.json(Request::get(url)).await?;
/// println!("{}", info["info"]["version"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: LinkConfig,
}

impl HttpClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::ClientBuild`] if the TLS backend or proxy settings
    /// cannot be initialized.
    #[instrument(level = "debug", skip_all, fields(offline = config.offline))]
    pub fn new(config: &LinkConfig) -> Result<Self, HttpError> {
        let client = build_client(config)?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Whether reachability probes are disabled.
    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.config.offline
    }

    /// Sends `request` and decodes the body into its expected [`ResponseKind`].
    ///
    /// # Errors
    ///
    /// - [`HttpError::Status`] for non-2xx responses, carrying the raw body
    /// - [`HttpError::Decode`] when the body does not match the expected shape
    /// - [`HttpError::Network`] / [`HttpError::Timeout`] for transport failures
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn send(&self, request: Request) -> Result<Payload, HttpError> {
        let expect = request.expect;
        let encoding = request.encoding.clone();
        let url = request.url.to_string();
        let response = self.execute(&request).await?;

        match expect {
            ResponseKind::Json => {
                let bytes = read_body(response, &url).await?;
                serde_json::from_slice(&bytes)
                    .map(Payload::Json)
                    .map_err(|e| HttpError::decode(&url, expect.as_str(), e.to_string()))
            }
            ResponseKind::Text => decode_text(response, &url, encoding.as_deref())
                .await
                .map(Payload::Text),
            ResponseKind::Bytes => read_body(response, &url).await.map(Payload::Bytes),
            ResponseKind::Empty => Ok(Payload::Empty),
        }
    }

    /// Sends `request` and deserializes the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send); a body that is valid JSON but does not
    /// fit `T` is a [`HttpError::Decode`].
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn json<T: DeserializeOwned>(&self, request: Request) -> Result<T, HttpError> {
        let url = request.url.to_string();
        let response = self.execute(&request).await?;
        let bytes = read_body(response, &url).await?;
        serde_json::from_slice(&bytes).map_err(|e| HttpError::decode(&url, "json", e.to_string()))
    }

    /// Sends `request` and decodes the body as text.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub async fn text(&self, request: Request) -> Result<String, HttpError> {
        let url = request.url.to_string();
        match self.send(request.expect(ResponseKind::Text)).await? {
            Payload::Text(text) => Ok(text),
            _ => Err(HttpError::decode(url, "text", "unexpected payload shape")),
        }
    }

    /// Sends `request` and returns the raw body.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub async fn bytes(&self, request: Request) -> Result<Vec<u8>, HttpError> {
        let url = request.url.to_string();
        match self.send(request.expect(ResponseKind::Bytes)).await? {
            Payload::Bytes(bytes) => Ok(bytes),
            _ => Err(HttpError::decode(url, "bytes", "unexpected payload shape")),
        }
    }

    /// Sends `request` and discards the body.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send), minus decode failures.
    pub async fn send_empty(&self, request: Request) -> Result<(), HttpError> {
        self.send(request.expect(ResponseKind::Empty)).await?;
        Ok(())
    }

    /// Performs the request and returns the status-checked response with its
    /// body still unread.
    pub(crate) async fn execute(&self, request: &Request) -> Result<reqwest::Response, HttpError> {
        let url = request.url.to_string();
        let target = request.url.to_parsed()?;
        let mut builder = self.client.request(request.method.to_reqwest(), target);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Raw(bytes) => builder.body(bytes.clone()),
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(pairs) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs)
                    .finish();
                builder
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(encoded)
            }
        };

        trace!(headers = request.headers.len(), "sending request");
        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::transport(&url, e))?;

        let status = response.status();
        debug!(status = status.as_u16(), "received response");
        if !status.is_success() {
            let body = read_body(response, &url).await?;
            return Err(HttpError::status(
                url,
                request.method.as_str(),
                status.as_u16(),
                String::from_utf8_lossy(&body),
            ));
        }
        Ok(response)
    }

    /// Underlying reqwest client, shared with the reachability probe.
    pub(crate) fn inner(&self) -> &Client {
        &self.client
    }
}

async fn read_body(response: reqwest::Response, url: &str) -> Result<Vec<u8>, HttpError> {
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|e| HttpError::transport(url, e))
}

async fn decode_text(
    response: reqwest::Response,
    url: &str,
    encoding: Option<&str>,
) -> Result<String, HttpError> {
    let Some(label) = encoding else {
        return response
            .text()
            .await
            .map_err(|e| HttpError::transport(url, e));
    };
    let bytes = read_body(response, url).await?;
    decode_with_label(&bytes, label).ok_or_else(|| {
        HttpError::decode(url, "text", format!("unsupported text encoding '{label}'"))
    })
}

fn decode_with_label(bytes: &[u8], label: &str) -> Option<String> {
    match label.trim().to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => Some(String::from_utf8_lossy(bytes).into_owned()),
        "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => {
            Some(bytes.iter().map(|&b| char::from(b)).collect())
        }
        "ascii" | "us-ascii" => Some(
            bytes
                .iter()
                .map(|&b| if b.is_ascii() { char::from(b) } else { '\u{FFFD}' })
                .collect(),
        ),
        _ => None,
    }
}

fn build_client(config: &LinkConfig) -> Result<Client, HttpError> {
    match try_build_client(config, false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            warn!(
                "HTTP client builder panicked while loading system proxy settings; retrying with env-proxy fallback"
            );
            match try_build_client(config, true) {
                Ok(client) => Ok(client),
                Err(BuildClientFailure::Build(error)) => Err(HttpError::ClientBuild {
                    reason: error.to_string(),
                }),
                Err(BuildClientFailure::Panic) => Err(HttpError::ClientBuild {
                    reason: "client builder panicked while applying env-proxy fallback".to_string(),
                }),
            }
        }
        Err(BuildClientFailure::Build(error)) => Err(HttpError::ClientBuild {
            reason: error.to_string(),
        }),
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

// `catch_unwind` leaves the panic hook in place; silence it while a guarded
// build runs so expected proxy panics do not print to stderr.
static CLIENT_BUILD_PANIC_HOOK_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

fn try_build_client(
    config: &LinkConfig,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    catch_unwind_silent(AssertUnwindSafe(move || {
        #[cfg(test)]
        maybe_inject_client_build_panic(disable_system_proxy_lookup);

        let mut builder = base_client_builder(config);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn catch_unwind_silent<F, T>(operation: F) -> Result<T, Box<dyn std::any::Any + Send + 'static>>
where
    F: FnOnce() -> T + std::panic::UnwindSafe,
{
    let _panic_hook_guard = CLIENT_BUILD_PANIC_HOOK_LOCK
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    let previous_hook = take_hook();
    set_hook(Box::new(|_| {}));
    let outcome = catch_unwind(operation);
    set_hook(previous_hook);
    outcome
}

fn base_client_builder(config: &LinkConfig) -> ClientBuilder {
    let agent = config
        .user_agent
        .clone()
        .unwrap_or_else(user_agent::default_user_agent);
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.read_timeout_secs))
        .gzip(true)
        .user_agent(agent)
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = env_proxy_for_scheme("https")
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = env_proxy_for_scheme("http")
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn env_proxy_for_scheme(scheme: &str) -> Option<String> {
    let names: &[&str] = match scheme {
        "https" => &["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"],
        "http" => &["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"],
        _ => return None,
    };
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
static CLIENT_BUILD_PANIC_INJECTION_COUNT: std::sync::atomic::AtomicUsize =
    std::sync::atomic::AtomicUsize::new(0);

#[cfg(test)]
fn maybe_inject_client_build_panic(disable_system_proxy_lookup: bool) {
    use std::sync::atomic::Ordering;

    if disable_system_proxy_lookup {
        return;
    }
    if CLIENT_BUILD_PANIC_INJECTION_COUNT
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
            if count > 0 { Some(count - 1) } else { None }
        })
        .is_ok()
    {
        panic!("injected HTTP client builder panic");
    }
}
