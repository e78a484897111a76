//! HTTP transport trait with a default reqwest implementation

use async_trait::async_trait;

use crate::error::Error;
use crate::request::{Method, Request};
use crate::response::RawResponse;

/// Capability to send a prepared request and return a response or a
/// transport-level failure.
///
/// The client never wraps transport errors: whatever `send` returns is
/// propagated verbatim to the caller. Implementations must buffer the
/// response body (streaming is out of scope) and should honor
/// [`Request::timeout`] when set.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one HTTP round trip.
    async fn send(&self, request: &Request) -> Result<RawResponse, Error>;
}

/// Default transport backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a default reqwest client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Wrap a pre-configured client so callers control pooling, TLS,
    /// proxies and default timeouts.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &Request) -> Result<RawResponse, Error> {
        let mut builder = self
            .client
            .request(request.method().into(), request.url().clone());
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }
        if let Some(timeout) = request.timeout() {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = convert_headers(response.headers());
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse::new(status, headers, body))
    }
}

/// Header values that are not valid UTF-8 are converted lossily so they stay
/// inspectable instead of being dropped.
fn convert_headers(headers: &reqwest::header::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}
