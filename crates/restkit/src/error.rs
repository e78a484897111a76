//! Client error types

use thiserror::Error;

use crate::response::RawResponse;

/// Errors returned by [`RestClient`](crate::RestClient) construction,
/// request building and dispatch.
///
/// Failure responses stay inspectable: the `BadStatus` and `Decode` variants
/// retain the [`RawResponse`] so callers keep access to the status code and
/// headers even on error paths. See [`Error::response`].
#[derive(Debug, Error)]
pub enum Error {
    /// The base URL could not be parsed at construction time.
    #[error("invalid base url: {0}")]
    InvalidUrl(#[source] url::ParseError),
    /// A configuration option rejected itself at construction time.
    #[error("invalid client configuration: {0}")]
    Config(String),
    /// The relative path could not be resolved against the base URL.
    #[error("error resolving request path {path:?}: {source}")]
    PathResolution {
        /// Relative path as passed by the caller.
        path: String,
        /// Underlying parse failure.
        #[source]
        source: url::ParseError,
    },
    /// The request body failed to encode as JSON.
    #[error("error encoding request body: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Network or connection level failure, propagated from the transport.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The request deadline elapsed before a response arrived.
    #[error("request timed out")]
    Timeout,
    /// The server answered with a status code >= 400.
    ///
    /// Produced by the default error hook; the message carries the status
    /// code and the response body text.
    #[error("bad status code: {message}")]
    BadStatus {
        /// The failure response, retained for inspection.
        response: RawResponse,
        /// Human readable description including status code and body.
        message: String,
    },
    /// The response body failed to decode into the destination type.
    #[error("error decoding response body: {source}")]
    Decode {
        /// The response whose body failed to decode.
        response: RawResponse,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// Catch-all for custom hooks and transports.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Response attached to a status or decode failure, when present.
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            Error::BadStatus { response, .. } | Error::Decode { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Status code of the attached response, when present.
    pub fn status(&self) -> Option<u16> {
        self.response().map(RawResponse::status)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Transport(Box::new(err))
        }
    }
}
