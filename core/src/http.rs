//! HTTP request types shared by the builder and the transports.
//!
//! # Design
//! `HttpRequest` describes a request as plain data. `RequestBuilder` fills it
//! in and validates every value on the way; a `Transport` only has to map the
//! finished value onto its own client and never re-checks anything.

use std::fmt;

use cookie::Cookie;

use crate::error::{not_blank, ClientError};
use crate::header::HttpHeaders;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn verb(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Whether a request body (raw or form-encoded) may be attached.
    pub fn is_body_allowed(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// A query or form parameter. Encoding is left to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HttpParameter {
    name: String,
    value: String,
}

impl HttpParameter {
    /// Fails with [`ClientError::Validation`] if `name` is blank.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Self, ClientError> {
        let name = name.into();
        not_blank(&name, "parameter name")?;
        Ok(Self {
            name,
            value: value.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An HTTP request described as plain data.
///
/// Built through [`RequestBuilder`](crate::RequestBuilder); a transport reads
/// it and performs the exchange. At most one of `form` and `body` is set.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HttpHeaders,
    pub query: Vec<HttpParameter>,
    pub form: Vec<HttpParameter>,
    pub body: Option<String>,
    pub cookies: Vec<Cookie<'static>>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HttpHeaders::new(),
            query: Vec::new(),
            form: Vec::new(),
            body: None,
            cookies: Vec::new(),
        }
    }

    /// Value of the `Cookie` header carrying every attached cookie, if any.
    ///
    /// Only `name=value` pairs are sent; attributes such as `Path` or
    /// `Max-Age` are response-side concepts.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
            .collect();
        Some(pairs.join("; "))
    }

    /// Payload to send: the url-encoded form when form parameters are present,
    /// the raw body otherwise.
    pub fn payload(&self) -> Result<Option<String>, serde_urlencoded::ser::Error> {
        if self.form.is_empty() {
            return Ok(self.body.clone());
        }
        let pairs: Vec<(&str, &str)> = self.form.iter().map(|p| (p.name(), p.value())).collect();
        serde_urlencoded::to_string(pairs).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_allowed_only_for_post_put_patch() {
        let allowed: Vec<HttpMethod> = [
            HttpMethod::Get,
            HttpMethod::Head,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::Delete,
            HttpMethod::Options,
        ]
        .into_iter()
        .filter(|m| m.is_body_allowed())
        .collect();
        assert_eq!(allowed, vec![HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch]);
    }

    #[test]
    fn method_displays_verb() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert_eq!(HttpMethod::Options.verb(), "OPTIONS");
    }

    #[test]
    fn parameter_requires_name() {
        assert!(matches!(HttpParameter::new(" ", "v"), Err(ClientError::Validation(_))));
        let param = HttpParameter::new("q", "").unwrap();
        assert_eq!(param.name(), "q");
        assert_eq!(param.value(), "");
    }

    #[test]
    fn new_request_is_empty() {
        let req = HttpRequest::new(HttpMethod::Get, "http://localhost:3000/");
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.headers.is_empty());
        assert!(req.query.is_empty());
        assert!(req.cookie_header().is_none());
        assert_eq!(req.payload().unwrap(), None);
    }

    #[test]
    fn cookie_header_joins_pairs() {
        let mut req = HttpRequest::new(HttpMethod::Get, "http://localhost/");
        req.cookies.push(Cookie::new("session", "abc"));
        req.cookies.push(Cookie::build(("theme", "dark")).path("/").http_only(true).build());
        assert_eq!(req.cookie_header().as_deref(), Some("session=abc; theme=dark"));
    }

    #[test]
    fn payload_encodes_form() {
        let mut req = HttpRequest::new(HttpMethod::Post, "http://localhost/");
        req.form.push(HttpParameter::new("name", "John Doe").unwrap());
        req.form.push(HttpParameter::new("tag", "a&b").unwrap());
        assert_eq!(req.payload().unwrap().as_deref(), Some("name=John+Doe&tag=a%26b"));
    }

    #[test]
    fn payload_falls_back_to_body() {
        let mut req = HttpRequest::new(HttpMethod::Put, "http://localhost/");
        req.body = Some("{\"a\":1}".to_string());
        assert_eq!(req.payload().unwrap().as_deref(), Some("{\"a\":1}"));
    }
}
