//! Minimal JSON REST client
//!
//! This crate builds JSON requests against a configured base URL, dispatches
//! them through a pluggable [`Transport`] and decodes JSON responses.
//! Non-2xx responses route through a customizable error hook. There are no
//! retries, no caching and no connection management beyond what the transport
//! itself provides.
//!
//! # Example
//!
//! ```no_run
//! use restkit::{Error, RestClient};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Widget {
//!     id: u64,
//!     name: String,
//! }
//!
//! async fn example() -> Result<Widget, Error> {
//!     let client = RestClient::new("https://api.example.com/v1/")?;
//!     client.fetch("widgets/1").await
//! }
//! ```

mod client;
mod error;
mod request;
mod response;
mod transport;

pub use client::{ErrorHook, PrepareHook, RestClient, RestClientBuilder};
pub use error::Error;
pub use request::{Method, Request};
pub use response::RawResponse;
pub use transport::{ReqwestTransport, Transport};
