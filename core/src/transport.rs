//! The network seam: turning an `HttpRequest` into an `HttpResponse`.
//!
//! # Design
//! `RequestBuilder` validates and assembles the request; a `Transport` only
//! performs the exchange. Whatever error a transport returns is wrapped into
//! `ClientError::HttpClient` by `RequestBuilder::execute`, so implementations
//! can use `?` freely on their client's own error types.
//!
//! `UreqTransport` is the bundled blocking implementation. It never turns a
//! status code into an error and never follows redirects, so tests see the
//! server's answer exactly as it was sent.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ureq::http::Response;
use ureq::typestate::WithBody;
use ureq::{Agent, Body, RequestBuilder};

use crate::error::BoxError;
use crate::header::{HttpHeader, HttpHeaders};
use crate::headers::COOKIE;
use crate::http::{HttpMethod, HttpRequest};
use crate::response::HttpResponse;

/// Executes a fully built request.
///
/// Called exactly once per `RequestBuilder::execute`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// The agent pools connections, so one transport should be reused for all
/// requests against the same server.
///
/// Bodies are read whole, up to ureq's 10 MB default limit; a longer body
/// fails the exchange. Bytes that are not valid UTF-8 are replaced with
/// U+FFFD rather than rejected.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// Bound the whole exchange (connect, send, receive) by `timeout`.
    /// `None` waits indefinitely.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        let payload = request.payload()?;
        let url = request.url.as_str();
        let started = Instant::now();

        let response = match request.method {
            HttpMethod::Get => prepare(self.agent.get(url), request).call(),
            HttpMethod::Head => prepare(self.agent.head(url), request).call(),
            HttpMethod::Delete => prepare(self.agent.delete(url), request).call(),
            HttpMethod::Options => prepare(self.agent.options(url), request).call(),
            HttpMethod::Post => send(prepare(self.agent.post(url), request), payload),
            HttpMethod::Put => send(prepare(self.agent.put(url), request), payload),
            HttpMethod::Patch => send(prepare(self.agent.patch(url), request), payload),
        }?;

        into_response(response, started)
    }
}

/// Copy headers, query parameters and cookies onto a ureq request.
fn prepare<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for header in &request.headers {
        for value in header.values() {
            builder = builder.header(header.name(), value.as_str());
        }
    }
    for param in &request.query {
        builder = builder.query(param.name(), param.value());
    }
    if let Some(cookies) = request.cookie_header() {
        builder = builder.header(COOKIE, cookies);
    }
    builder
}

fn send(builder: RequestBuilder<WithBody>, payload: Option<String>) -> Result<Response<Body>, ureq::Error> {
    match payload {
        Some(payload) => builder.send(payload.as_bytes()),
        None => builder.send_empty(),
    }
}

fn into_response(mut response: Response<Body>, started: Instant) -> Result<HttpResponse, BoxError> {
    let status = response.status().as_u16();
    let headers: HttpHeaders = response
        .headers()
        .iter()
        .map(|(name, value)| HttpHeader::trusted(name.as_str(), String::from_utf8_lossy(value.as_bytes())))
        .collect();
    let body = decode_body(response.body_mut().read_to_vec()?);

    Ok(HttpResponse::new(status, body, headers, started.elapsed()))
}

fn decode_body(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}
