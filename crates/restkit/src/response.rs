//! HTTP response types

use serde::de::DeserializeOwned;

use crate::error::Error;

/// Raw HTTP response with status code, headers and buffered body.
///
/// Streaming bodies are out of scope, so transports read the full body before
/// returning. Whoever owns the value owns the body; dropping it releases it.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RawResponse {
    /// Create a response from its parts. Transports call this after reading
    /// the full body.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Check if the response status is a success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response status is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response status is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// All headers in the order the transport produced them.
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

    /// Raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get the response body as text
    pub fn text(&self) -> Result<&str, Error> {
        std::str::from_utf8(&self.body)
            .map_err(|_| Error::Other("response body is not valid UTF-8".to_string()))
    }

    /// Get the response body as JSON
    ///
    /// Decode failures return [`Error::Decode`] carrying a copy of this
    /// response, so status and headers stay available to the caller.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|source| Error::Decode {
            response: self.clone(),
            source,
        })
    }
}
