//! Test harness core: embedded server lifecycle and a fluent HTTP client.
//!
//! # Overview
//! - [`ServerRule`] starts, stops and restarts an [`EmbeddedServer`] around a
//!   test, stopping it on every exit path.
//! - [`HttpClient`] / [`RequestBuilder`] assemble an [`HttpRequest`] through
//!   validated, chainable calls and execute it through a [`Transport`],
//!   yielding an [`HttpResponse`].
//!
//! # Design
//! - Validation happens in the builder, once, for every transport.
//! - A transport only maps a finished `HttpRequest` onto real I/O;
//!   [`UreqTransport`] is the bundled blocking implementation.
//! - Header names compare case-insensitively everywhere.
//! - Execution failures surface as a single [`ClientError::HttpClient`]
//!   variant; lifecycle failures keep the server's own error type.
//!
//! # Example
//! ```no_run
//! use harness_core::{EmbeddedServer, HttpClient, ServerRule, UreqTransport};
//!
//! fn check<S: EmbeddedServer>(server: S) -> Result<(), S::Error> {
//!     let mut rule = ServerRule::new(server);
//!     rule.run(|rule| {
//!         let client = HttpClient::for_server(rule.server(), UreqTransport::new()).unwrap();
//!         let response = client.prepare_get("/health").accept_json().execute().unwrap();
//!         assert_eq!(response.status(), 200);
//!     })
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod header;
pub mod headers;
pub mod http;
pub mod request;
pub mod response;
pub mod rule;
pub mod server;
pub mod transport;

pub use client::HttpClient;
pub use config::{ConfigError, EmbeddedConfiguration};
pub use cookie::Cookie;
pub use error::{BoxError, ClientError};
pub use header::{HttpHeader, HttpHeaders};
pub use http::{HttpMethod, HttpParameter, HttpRequest};
pub use request::RequestBuilder;
pub use response::HttpResponse;
pub use rule::ServerRule;
pub use server::EmbeddedServer;
pub use transport::{Transport, UreqTransport};
