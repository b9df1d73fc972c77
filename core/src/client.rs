//! Entry point for building requests against a base URL.
//!
//! # Design
//! `HttpClient` holds a base URL and a transport and nothing else. Each
//! `prepare_*` call starts a fresh `RequestBuilder`, so requests never share
//! state. Point it at an embedded server with `for_server`.

use crate::error::ClientError;
use crate::http::HttpMethod;
use crate::request::RequestBuilder;
use crate::server::EmbeddedServer;
use crate::transport::{Transport, UreqTransport};

#[derive(Debug, Clone)]
pub struct HttpClient<T> {
    base_url: String,
    transport: T,
}

impl HttpClient<UreqTransport> {
    /// Client using a default [`UreqTransport`].
    pub fn ureq(base_url: &str) -> Self {
        Self::new(base_url, UreqTransport::new())
    }
}

impl<T: Transport> HttpClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Target a running embedded server.
    ///
    /// Fails with [`ClientError::Validation`] when the server is not started.
    pub fn for_server<S>(server: &S, transport: T) -> Result<Self, ClientError>
    where
        S: EmbeddedServer + ?Sized,
    {
        let url = server
            .url()
            .ok_or_else(|| ClientError::Validation("server is not started".to_string()))?;
        Ok(Self::new(&url, transport))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve `path` against the base URL. Absolute URLs pass through.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn prepare_request(&self, method: HttpMethod, path: &str) -> RequestBuilder<'_, T> {
        RequestBuilder::new(&self.transport, method, self.url(path))
    }

    pub fn prepare_get(&self, path: &str) -> RequestBuilder<'_, T> {
        self.prepare_request(HttpMethod::Get, path)
    }

    pub fn prepare_head(&self, path: &str) -> RequestBuilder<'_, T> {
        self.prepare_request(HttpMethod::Head, path)
    }

    pub fn prepare_post(&self, path: &str) -> RequestBuilder<'_, T> {
        self.prepare_request(HttpMethod::Post, path)
    }

    pub fn prepare_put(&self, path: &str) -> RequestBuilder<'_, T> {
        self.prepare_request(HttpMethod::Put, path)
    }

    pub fn prepare_patch(&self, path: &str) -> RequestBuilder<'_, T> {
        self.prepare_request(HttpMethod::Patch, path)
    }

    pub fn prepare_delete(&self, path: &str) -> RequestBuilder<'_, T> {
        self.prepare_request(HttpMethod::Delete, path)
    }

    pub fn prepare_options(&self, path: &str) -> RequestBuilder<'_, T> {
        self.prepare_request(HttpMethod::Options, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    use crate::error::BoxError;
    use crate::http::HttpRequest;
    use crate::response::HttpResponse;

    #[derive(Debug)]
    struct Unused;

    impl Transport for Unused {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, BoxError> {
            Err("not used".into())
        }
    }

    #[derive(Debug)]
    struct Fixed {
        port: Option<u16>,
    }

    impl EmbeddedServer for Fixed {
        type Error = Infallible;

        fn start(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        fn stop(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        fn is_started(&self) -> bool {
            self.port.is_some()
        }

        fn port(&self) -> Option<u16> {
            self.port
        }

        fn path(&self) -> &str {
            "/app"
        }
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = HttpClient::new("http://localhost:3000/", Unused);
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/echo"), "http://localhost:3000/echo");
        assert_eq!(client.url("echo"), "http://localhost:3000/echo");
        assert_eq!(client.url(""), "http://localhost:3000/");
    }

    #[test]
    fn absolute_urls_pass_through() {
        let client = HttpClient::new("http://localhost:3000", Unused);
        assert_eq!(client.url("http://example.com/x"), "http://example.com/x");
    }

    #[test]
    fn prepare_sets_method_and_url() {
        let client = HttpClient::new("http://localhost:3000", Unused);
        let cases = [
            (client.prepare_get("/a"), HttpMethod::Get),
            (client.prepare_head("/a"), HttpMethod::Head),
            (client.prepare_post("/a"), HttpMethod::Post),
            (client.prepare_put("/a"), HttpMethod::Put),
            (client.prepare_patch("/a"), HttpMethod::Patch),
            (client.prepare_delete("/a"), HttpMethod::Delete),
            (client.prepare_options("/a"), HttpMethod::Options),
        ];
        for (builder, method) in cases {
            assert_eq!(builder.method(), method);
            assert_eq!(builder.request().url, "http://localhost:3000/a");
        }
    }

    #[test]
    fn for_server_uses_server_url() {
        let server = Fixed { port: Some(4242) };
        let client = HttpClient::for_server(&server, Unused).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:4242/app");
        assert_eq!(client.url("/echo"), "http://127.0.0.1:4242/app/echo");
    }

    #[test]
    fn for_server_requires_started_server() {
        let server = Fixed { port: None };
        let err = HttpClient::for_server(&server, Unused).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }
}
