//! REST client and builder

use core::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::Error;
use crate::request::{Method, Request};
use crate::response::RawResponse;
use crate::transport::{ReqwestTransport, Transport};

/// Hook invoked on a fully built request before dispatch.
///
/// Typical use is injecting auth headers or validating the request; returning
/// an error aborts request building.
pub type PrepareHook = Arc<dyn Fn(&mut Request) -> Result<(), Error> + Send + Sync>;

/// Hook invoked when a response carries a status code >= 400.
///
/// The hook consumes the response and produces the terminal error. Hooks that
/// want the response to stay inspectable embed it in the returned error, as
/// the default hook does with [`Error::BadStatus`].
pub type ErrorHook = Arc<dyn Fn(&Request, RawResponse) -> Error + Send + Sync>;

/// Minimal JSON REST client.
///
/// Holds a base URL parsed once at construction, a shared transport and the
/// construction-time hooks. Stateless after construction: the client is
/// `Clone` and safe to share across tasks, every call operates on
/// caller-local request and response values. Cancellation is by dropping the
/// in-flight send future; deadlines via [`Request::set_timeout`].
#[derive(Clone)]
pub struct RestClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
    prepare: Option<PrepareHook>,
    handle_error: ErrorHook,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a client with the default transport and error hook.
    ///
    /// Fails with [`Error::InvalidUrl`] when `base_url` does not parse, so a
    /// malformed base URL is a construction-time failure rather than a
    /// per-request one.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        Self::builder(base_url).build()
    }

    /// Create a builder for a client with custom transport or hooks.
    pub fn builder(base_url: impl Into<String>) -> RestClientBuilder {
        RestClientBuilder {
            base_url: base_url.into(),
            transport: None,
            prepare: None,
            handle_error: None,
        }
    }

    /// The parsed base URL all relative paths resolve against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a request without a body.
    ///
    /// Resolves `path` against the base URL with path-segment semantics, sets
    /// `Accept: application/json` and runs the prepare hook.
    pub fn request(&self, method: Method, path: &str) -> Result<Request, Error> {
        self.build_request(method, path, None)
    }

    /// Build a request with a JSON body.
    ///
    /// As [`RestClient::request`], plus the body serialized as JSON and
    /// `Content-Type: application/json` set. Encode failure is
    /// [`Error::Serialization`].
    pub fn request_json<B>(&self, method: Method, path: &str, body: &B) -> Result<Request, Error>
    where
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body)?;
        self.build_request(method, path, Some(payload))
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Request, Error> {
        let url = self.resolve_path(path)?;
        let mut request = Request::new(method, url);
        if let Some(body) = body {
            request.set_body(body);
            request.set_header("Content-Type", "application/json");
        }
        request.set_header("Accept", "application/json");
        if let Some(prepare) = &self.prepare {
            prepare(&mut request)?;
        }
        Ok(request)
    }

    /// Join `path` onto the base URL's path using segment rules: empty and
    /// `.` segments collapse, `..` pops, so `/api` + `widgets` resolves to
    /// `/api/widgets` with no double slashes.
    fn resolve_path(&self, path: &str) -> Result<Url, Error> {
        let mut segments: Vec<&str> = Vec::new();
        for segment in self.base_url.path().split('/').chain(path.split('/')) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                segment => segments.push(segment),
            }
        }
        let joined = format!("/{}", segments.join("/"));
        self.base_url
            .join(&joined)
            .map_err(|source| Error::PathResolution {
                path: path.to_string(),
                source,
            })
    }

    /// Dispatch a request, returning the raw response.
    ///
    /// This is the no-destination path: no decode is attempted for any
    /// status. Transport failures propagate verbatim; a status >= 400 routes
    /// through the error hook and returns its error.
    pub async fn send(&self, request: Request) -> Result<RawResponse, Error> {
        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self.transport.send(&request).await?;
        if response.status() >= 400 {
            tracing::debug!(status = response.status(), "request failed with error status");
            return Err((self.handle_error)(&request, response));
        }
        Ok(response)
    }

    /// Dispatch a request and decode the response body into `T`.
    ///
    /// Error statuses route through the error hook before any decode
    /// attempt. Decode failure is [`Error::Decode`] with the raw response
    /// retained.
    ///
    /// The decoded value is all this returns on success. Callers that also
    /// need the response status or headers should use [`RestClient::send`]
    /// and decode via [`RawResponse::json`].
    pub async fn send_json<T: DeserializeOwned>(&self, request: Request) -> Result<T, Error> {
        let response = self.send(request).await?;
        response.json()
    }

    /// GET `path` and decode the response as JSON.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let request = self.request(Method::Get, path)?;
        self.send_json(request).await
    }

    /// POST a JSON body to `path` and decode the response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request_json(Method::Post, path, body)?;
        self.send_json(request).await
    }

    /// PUT a JSON body to `path` and decode the response.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request_json(Method::Put, path, body)?;
        self.send_json(request).await
    }

    /// PATCH a JSON body to `path` and decode the response.
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request_json(Method::Patch, path, body)?;
        self.send_json(request).await
    }

    /// DELETE `path`, returning the raw response.
    pub async fn delete(&self, path: &str) -> Result<RawResponse, Error> {
        let request = self.request(Method::Delete, path)?;
        self.send(request).await
    }
}

/// Builder for [`RestClient`].
///
/// Every option is independently settable; validation happens in
/// [`RestClientBuilder::build`].
pub struct RestClientBuilder {
    base_url: String,
    transport: Option<Arc<dyn Transport>>,
    prepare: Option<PrepareHook>,
    handle_error: Option<ErrorHook>,
}

impl fmt::Debug for RestClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClientBuilder")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RestClientBuilder {
    /// Override the default transport with a shared instance.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set a hook that runs on every built request before dispatch.
    pub fn prepare_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Request) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.prepare = Some(Arc::new(hook));
        self
    }

    /// Replace the default error hook for status codes >= 400.
    pub fn handle_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Request, RawResponse) -> Error + Send + Sync + 'static,
    {
        self.handle_error = Some(Arc::new(hook));
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// Parses the base URL exactly once; [`Error::InvalidUrl`] for unparsable
    /// input, [`Error::Config`] for URLs that cannot serve as a base (e.g.
    /// `mailto:`).
    pub fn build(self) -> Result<RestClient, Error> {
        let base_url = Url::parse(&self.base_url).map_err(Error::InvalidUrl)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base url {base_url} cannot serve as a base"
            )));
        }
        Ok(RestClient {
            base_url,
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(ReqwestTransport::new())),
            prepare: self.prepare,
            handle_error: self.handle_error.unwrap_or_else(|| Arc::new(default_error_hook)),
        })
    }
}

/// Default error hook: fold status and body text into [`Error::BadStatus`].
///
/// A body that fails to read as UTF-8 degrades to a status-only message
/// rather than surfacing the read failure, so callers always receive a
/// status error.
fn default_error_hook(_request: &Request, response: RawResponse) -> Error {
    let message = match response.text() {
        Ok(body) => format!("response code: {}, body:\n{}", response.status(), body),
        Err(_) => format!("response code: {}", response.status()),
    };
    Error::BadStatus { response, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> RestClient {
        RestClient::new(base_url).expect("Valid base URL")
    }

    #[test]
    fn test_invalid_base_url() {
        let result = RestClient::new("://not-a-url");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_relative_base_url_is_invalid() {
        let result = RestClient::new("api.example.com/v1");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_cannot_be_a_base_url_rejected() {
        let result = RestClient::new("mailto:user@example.com");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_base_url_accessor() {
        let client = client("https://api.example.com/v1/");
        assert_eq!(client.base_url().as_str(), "https://api.example.com/v1/");
    }

    #[test]
    fn test_resolve_path_with_trailing_slash() {
        let client = client("https://api.example.com/v1/");
        let request = client.request(Method::Get, "widgets").expect("Valid path");
        assert_eq!(request.url().as_str(), "https://api.example.com/v1/widgets");
    }

    #[test]
    fn test_resolve_path_without_trailing_slash() {
        let client = client("https://api.example.com/api");
        let request = client.request(Method::Get, "widgets").expect("Valid path");
        assert_eq!(request.url().as_str(), "https://api.example.com/api/widgets");
    }

    #[test]
    fn test_resolve_path_with_leading_slash() {
        let client = client("https://api.example.com/v1");
        let request = client.request(Method::Get, "/widgets").expect("Valid path");
        assert_eq!(request.url().as_str(), "https://api.example.com/v1/widgets");
    }

    #[test]
    fn test_resolve_path_collapses_redundant_separators() {
        let client = client("https://api.example.com/v1//");
        let request = client
            .request(Method::Get, "widgets//1")
            .expect("Valid path");
        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/v1/widgets/1"
        );
    }

    #[test]
    fn test_resolve_path_handles_parent_segments() {
        let client = client("https://api.example.com/v1/");
        let request = client
            .request(Method::Get, "widgets/../gadgets")
            .expect("Valid path");
        assert_eq!(request.url().as_str(), "https://api.example.com/v1/gadgets");
    }

    #[test]
    fn test_resolve_empty_path() {
        let client = client("https://api.example.com/v1/");
        let request = client.request(Method::Get, "").expect("Valid path");
        assert_eq!(request.url().as_str(), "https://api.example.com/v1");
    }

    #[test]
    fn test_request_sets_accept_header_only() {
        let client = client("https://api.example.com/");
        let request = client.request(Method::Get, "widgets").expect("Valid path");
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(request.header("Content-Type"), None);
        assert!(request.body().is_none());
    }

    #[test]
    fn test_request_json_sets_content_type_and_body() {
        let client = client("https://api.example.com/");
        let body = serde_json::json!({"name": "a"});
        let request = client
            .request_json(Method::Post, "widgets", &body)
            .expect("Valid request");
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(request.body(), Some(br#"{"name":"a"}"#.as_slice()));
    }

    #[test]
    fn test_prepare_hook_mutates_request() {
        let client = RestClient::builder("https://api.example.com/")
            .prepare_request(|request| {
                request.set_header("Authorization", "Bearer token123");
                Ok(())
            })
            .build()
            .expect("Valid client");
        let request = client.request(Method::Get, "widgets").expect("Valid path");
        assert_eq!(request.header("Authorization"), Some("Bearer token123"));
    }

    #[test]
    fn test_prepare_hook_failure_aborts_build() {
        let client = RestClient::builder("https://api.example.com/")
            .prepare_request(|_| Err(Error::Other("rejected".to_string())))
            .build()
            .expect("Valid client");
        let result = client.request(Method::Get, "widgets");
        assert!(matches!(result, Err(Error::Other(_))));
    }

    #[test]
    fn test_default_error_hook_message() {
        let client = client("https://api.example.com/");
        let request = client.request(Method::Get, "widgets").expect("Valid path");
        let response = RawResponse::new(404, vec![], b"not found".to_vec());

        let error = default_error_hook(&request, response);
        let message = format!("{}", error);
        assert!(message.contains("404"));
        assert!(message.contains("not found"));
        assert_eq!(error.status(), Some(404));
    }

    #[test]
    fn test_default_error_hook_degrades_on_unreadable_body() {
        let client = client("https://api.example.com/");
        let request = client.request(Method::Get, "widgets").expect("Valid path");
        let response = RawResponse::new(500, vec![], vec![0xff, 0xfe]);

        let error = default_error_hook(&request, response);
        let message = format!("{}", error);
        assert!(message.contains("500"));
        assert!(!message.contains("body"));
    }

    #[test]
    fn test_client_debug_omits_hooks() {
        let client = client("https://api.example.com/");
        let rendered = format!("{client:?}");
        assert!(rendered.contains("api.example.com"));
    }
}
