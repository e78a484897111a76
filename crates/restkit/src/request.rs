//! HTTP request model
//!
//! Requests are plain owned data so they can be handed to any
//! [`Transport`](crate::Transport) implementation and mutated by prepare
//! hooks without touching the network.

use core::fmt;
use std::time::Duration;

use url::Url;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
}

impl Method {
    /// Method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built HTTP request.
///
/// Produced by [`RestClient::request`](crate::RestClient::request) and
/// [`RestClient::request_json`](crate::RestClient::request_json): the target
/// URL is already resolved against the base URL and the standard JSON headers
/// are set. Prepare hooks receive `&mut Request` and may adjust headers or
/// the deadline before dispatch.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    timeout: Option<Duration>,
}

impl Request {
    pub(crate) fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// Request method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Absolute target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// All headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set a header, replacing any existing value under the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers
            .retain(|(key, _)| !key.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Request body bytes, when a body was supplied.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub(crate) fn set_body(&mut self, body: Vec<u8>) {
        self.body = Some(body);
    }

    /// Per-request deadline, when one was set.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Bind a deadline to this request.
    ///
    /// The transport aborts the pending round trip once the deadline elapses.
    /// Dropping the in-flight send future cancels the request as well.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }
}
