//! Read-only view over an executed HTTP exchange.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{not_blank, ClientError};
use crate::header::{HttpHeader, HttpHeaders};
use crate::headers::{CACHE_CONTROL, CONTENT_ENCODING, CONTENT_TYPE, ETAG, LOCATION};

/// An HTTP response produced by exactly one execution.
///
/// The duration is whatever the transport measured around the exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    body: String,
    headers: HttpHeaders,
    duration: Duration,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>, headers: HttpHeaders, duration: Duration) -> Self {
        Self {
            status,
            body: body.into(),
            headers,
            duration,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    pub fn request_duration(&self) -> Duration {
        self.duration
    }

    pub fn request_duration_nanos(&self) -> u128 {
        self.duration.as_nanos()
    }

    pub fn request_duration_millis(&self) -> u128 {
        self.duration.as_millis()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirection(&self) -> bool {
        (300..400).contains(&self.status)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Case-insensitive header presence check. A blank name is never present.
    pub fn contains_header(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    /// Look up a header by case-insensitive name.
    ///
    /// Fails with [`ClientError::Validation`] if `name` is blank; a missing
    /// header is `Ok(None)`.
    pub fn header(&self, name: &str) -> Result<Option<&HttpHeader>, ClientError> {
        not_blank(name, "name")?;
        Ok(self.headers.get(name))
    }

    pub fn has_etag_header(&self) -> bool {
        self.headers.contains(ETAG)
    }

    pub fn etag(&self) -> Option<&HttpHeader> {
        self.headers.get(ETAG)
    }

    pub fn content_type(&self) -> Option<&HttpHeader> {
        self.headers.get(CONTENT_TYPE)
    }

    pub fn content_encoding(&self) -> Option<&HttpHeader> {
        self.headers.get(CONTENT_ENCODING)
    }

    pub fn location(&self) -> Option<&HttpHeader> {
        self.headers.get(LOCATION)
    }

    pub fn cache_control(&self) -> Option<&HttpHeader> {
        self.headers.get(CACHE_CONTROL)
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn response(status: u16, headers: &[(&str, &str)], body: &str) -> HttpResponse {
        let headers = headers
            .iter()
            .map(|(name, value)| HttpHeader::new(*name, *value).unwrap())
            .collect();
        HttpResponse::new(status, body, headers, Duration::from_micros(2_500))
    }

    #[test]
    fn exposes_status_body_and_duration() {
        let resp = response(201, &[], "created");
        assert_eq!(resp.status(), 201);
        assert_eq!(resp.body(), "created");
        assert_eq!(resp.request_duration_nanos(), 2_500_000);
        assert_eq!(resp.request_duration_millis(), 2);
        assert!(resp.is_success());
        assert!(!resp.is_client_error());
    }

    #[test]
    fn status_classes() {
        assert!(response(304, &[], "").is_redirection());
        assert!(response(404, &[], "").is_client_error());
        assert!(response(503, &[], "").is_server_error());
    }

    #[test]
    fn well_known_headers_are_case_insensitive() {
        let resp = response(
            200,
            &[
                ("etag", "\"v1\""),
                ("content-type", "application/json"),
                ("CONTENT-ENCODING", "gzip"),
                ("location", "/resource/1"),
                ("cache-control", "no-cache"),
            ],
            "",
        );
        assert!(resp.has_etag_header());
        assert_eq!(resp.etag().unwrap().first_value(), "\"v1\"");
        assert_eq!(resp.content_type().unwrap().first_value(), "application/json");
        assert_eq!(resp.content_encoding().unwrap().first_value(), "gzip");
        assert_eq!(resp.location().unwrap().first_value(), "/resource/1");
        assert_eq!(resp.cache_control().unwrap().first_value(), "no-cache");
    }

    #[test]
    fn missing_headers_are_none() {
        let resp = response(200, &[], "");
        assert!(!resp.has_etag_header());
        assert!(resp.etag().is_none());
        assert!(resp.content_type().is_none());
        assert!(resp.content_encoding().is_none());
        assert!(resp.location().is_none());
        assert!(resp.cache_control().is_none());
        assert!(resp.header("X-Missing").unwrap().is_none());
    }

    #[test]
    fn header_lookup_rejects_blank_name() {
        let resp = response(200, &[("X-Id", "1")], "");
        assert!(matches!(resp.header(""), Err(ClientError::Validation(_))));
        assert!(resp.contains_header("x-id"));
        assert_eq!(resp.header("X-ID").unwrap().unwrap().first_value(), "1");
    }

    #[test]
    fn json_body() {
        #[derive(Debug, Deserialize)]
        struct Greeting {
            hello: String,
        }

        let resp = response(200, &[], r#"{"hello":"world"}"#);
        let greeting: Greeting = resp.json().unwrap();
        assert_eq!(greeting.hello, "world");

        let err = response(200, &[], "not json").json::<Greeting>().unwrap_err();
        assert!(matches!(err, ClientError::Deserialization(_)));
    }
}
