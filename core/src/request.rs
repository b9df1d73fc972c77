//! Fluent request builder.
//!
//! # Design
//! `RequestBuilder` owns one `HttpRequest` and borrows the transport that
//! will execute it. Every call consumes the builder and hands it back, so a
//! chain always describes exactly one request. Calls that validate their
//! argument return `Result<Self, ClientError>` and are chained with `?`;
//! shortcuts with fixed values return `Self` directly.
//!
//! All argument checks live here, which gives every transport the same
//! guarantees: blank values and method/body mismatches are rejected before
//! anything touches the network.
//!
//! Form parameters and a raw body are mutually exclusive. Whichever is set
//! last wins: adding form parameters drops a previously set body, and setting
//! a body drops previously added form parameters.

use std::fmt;
use std::time::SystemTime;

use cookie::Cookie;
use tracing::debug;

use crate::error::{not_blank, ClientError};
use crate::header::HttpHeader;
use crate::headers::{
    http_date, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, APPLICATION_FORM_URL_ENCODED, APPLICATION_JSON,
    APPLICATION_XML, CONTENT_TYPE, GZIP_DEFLATE, IF_MATCH, IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_UNMODIFIED_SINCE,
    MULTIPART_FORM_DATA, ORIGIN, REFERER, USER_AGENT, XML_HTTP_REQUEST, X_CSRF_TOKEN, X_HTTP_METHOD_OVERRIDE,
    X_REQUESTED_WITH,
};
use crate::http::{HttpMethod, HttpParameter, HttpRequest};
use crate::response::HttpResponse;
use crate::transport::Transport;

/// Builds one request and executes it through a [`Transport`].
#[must_use = "a request is only sent by `execute`"]
pub struct RequestBuilder<'t, T: Transport + ?Sized> {
    transport: &'t T,
    request: HttpRequest,
}

impl<'t, T: Transport + ?Sized> RequestBuilder<'t, T> {
    pub fn new(transport: &'t T, method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            transport,
            request: HttpRequest::new(method, url),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.request.method
    }

    /// The request assembled so far.
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    // -----------------------------------------------------------------------
    // Headers
    // -----------------------------------------------------------------------

    /// Add a header value. Repeated names accumulate values.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, ClientError> {
        let header = HttpHeader::new(name, value)?;
        self.request.headers.append(header);
        Ok(self)
    }

    pub fn accept(self, media_type: &str) -> Result<Self, ClientError> {
        self.append_checked(ACCEPT, media_type, "media type")
    }

    pub fn accept_json(self) -> Self {
        self.append(ACCEPT, APPLICATION_JSON)
    }

    pub fn accept_xml(self) -> Self {
        self.append(ACCEPT, APPLICATION_XML)
    }

    pub fn accept_language(self, lang: &str) -> Result<Self, ClientError> {
        self.append_checked(ACCEPT_LANGUAGE, lang, "lang")
    }

    pub fn accept_encoding(self, encoding: &str) -> Result<Self, ClientError> {
        self.append_checked(ACCEPT_ENCODING, encoding, "encoding")
    }

    /// Shortcut for `Accept-Encoding: gzip, deflate`.
    pub fn accept_gzip(self) -> Self {
        self.append(ACCEPT_ENCODING, GZIP_DEFLATE)
    }

    pub fn origin(self, origin: &str) -> Result<Self, ClientError> {
        self.append_checked(ORIGIN, origin, "origin")
    }

    pub fn referer(self, referer: &str) -> Result<Self, ClientError> {
        self.append_checked(REFERER, referer, "referer")
    }

    pub fn if_none_match(self, etag: &str) -> Result<Self, ClientError> {
        self.append_checked(IF_NONE_MATCH, etag, "etag")
    }

    pub fn if_match(self, etag: &str) -> Result<Self, ClientError> {
        self.append_checked(IF_MATCH, etag, "etag")
    }

    /// Sets `If-Modified-Since`, formatted as `Wed, 21 Oct 2015 07:28:00 GMT`.
    ///
    /// Fails with [`ClientError::Validation`] outside years 1970 to 9999.
    pub fn if_modified_since(self, time: SystemTime) -> Result<Self, ClientError> {
        let date = http_date(time)?;
        Ok(self.append(IF_MODIFIED_SINCE, &date))
    }

    /// Sets `If-Unmodified-Since`, formatted as `Wed, 21 Oct 2015 07:28:00 GMT`.
    ///
    /// Fails with [`ClientError::Validation`] outside years 1970 to 9999.
    pub fn if_unmodified_since(self, time: SystemTime) -> Result<Self, ClientError> {
        let date = http_date(time)?;
        Ok(self.append(IF_UNMODIFIED_SINCE, &date))
    }

    pub fn user_agent(self, user_agent: &str) -> Result<Self, ClientError> {
        self.append_checked(USER_AGENT, user_agent, "user agent")
    }

    /// Mark the request as an XHR call (`X-Requested-With: XMLHttpRequest`).
    pub fn as_xml_http_request(self) -> Self {
        self.append(X_REQUESTED_WITH, XML_HTTP_REQUEST)
    }

    pub fn csrf_token(self, token: &str) -> Result<Self, ClientError> {
        self.append_checked(X_CSRF_TOKEN, token, "token")
    }

    /// Tunnel another method through `X-HTTP-Method-Override`.
    pub fn x_http_method_override(self, method: &str) -> Result<Self, ClientError> {
        let method = not_blank(method, "method")?;
        Ok(self.replace(X_HTTP_METHOD_OVERRIDE, method))
    }

    pub fn override_put(self) -> Self {
        self.replace(X_HTTP_METHOD_OVERRIDE, HttpMethod::Put.verb())
    }

    pub fn override_delete(self) -> Self {
        self.replace(X_HTTP_METHOD_OVERRIDE, HttpMethod::Delete.verb())
    }

    // -----------------------------------------------------------------------
    // Content type
    // -----------------------------------------------------------------------

    pub fn as_json(self) -> Self {
        self.replace(CONTENT_TYPE, APPLICATION_JSON)
    }

    pub fn as_xml(self) -> Self {
        self.replace(CONTENT_TYPE, APPLICATION_XML)
    }

    pub fn as_form_url_encoded(self) -> Self {
        self.replace(CONTENT_TYPE, APPLICATION_FORM_URL_ENCODED)
    }

    pub fn as_multipart_form_data(self) -> Self {
        self.replace(CONTENT_TYPE, MULTIPART_FORM_DATA)
    }

    // -----------------------------------------------------------------------
    // Parameters, body and cookies
    // -----------------------------------------------------------------------

    pub fn query_param(self, name: &str, value: &str) -> Result<Self, ClientError> {
        self.query_params([HttpParameter::new(name, value)?])
    }

    /// Append query parameters in order. Repeated names accumulate.
    pub fn query_params<I>(mut self, params: I) -> Result<Self, ClientError>
    where
        I: IntoIterator<Item = HttpParameter>,
    {
        let params = non_empty(params)?;
        self.request.query.extend(params);
        Ok(self)
    }

    /// Fails with [`ClientError::UnsupportedOperation`] if the method does not
    /// allow a body.
    pub fn form_param(self, name: &str, value: &str) -> Result<Self, ClientError> {
        self.ensure_body_allowed("form parameters")?;
        self.form_params([HttpParameter::new(name, value)?])
    }

    /// Append form parameters and switch `Content-Type` to
    /// `application/x-www-form-urlencoded`.
    ///
    /// Fails with [`ClientError::UnsupportedOperation`] if the method does not
    /// allow a body.
    pub fn form_params<I>(mut self, params: I) -> Result<Self, ClientError>
    where
        I: IntoIterator<Item = HttpParameter>,
    {
        self.ensure_body_allowed("form parameters")?;
        let params = non_empty(params)?;
        self.request.body = None;
        self.request.form.extend(params);
        Ok(self.as_form_url_encoded())
    }

    /// Fails with [`ClientError::UnsupportedOperation`] if the method does not
    /// allow a body.
    pub fn body(mut self, body: impl Into<String>) -> Result<Self, ClientError> {
        self.ensure_body_allowed("a request body")?;
        self.request.form.clear();
        self.request.body = Some(body.into());
        Ok(self)
    }

    /// Attach a cookie. A cookie with the same name replaces the earlier one.
    pub fn cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.request.cookies.retain(|existing| existing.name() != cookie.name());
        self.request.cookies.push(cookie);
        self
    }

    // -----------------------------------------------------------------------
    // Execution
    // -----------------------------------------------------------------------

    /// Send the request.
    ///
    /// Any transport failure (I/O, protocol, timeout) is returned as
    /// [`ClientError::HttpClient`] with the original error as its source.
    pub fn execute(self) -> Result<HttpResponse, ClientError> {
        let Self { transport, request } = self;
        debug!(method = %request.method, url = %request.url, "executing request");

        match transport.execute(&request) {
            Ok(response) => {
                debug!(
                    method = %request.method,
                    url = %request.url,
                    status = response.status(),
                    elapsed = ?response.request_duration(),
                    "request completed"
                );
                Ok(response)
            }
            Err(source) => {
                debug!(method = %request.method, url = %request.url, error = %source, "request failed");
                Err(ClientError::HttpClient { source })
            }
        }
    }

    /// Send with `Content-Type` and `Accept` set to JSON.
    pub fn execute_json(self) -> Result<HttpResponse, ClientError> {
        self.as_json().accept_json().execute()
    }

    /// Send with `Content-Type` and `Accept` set to XML.
    pub fn execute_xml(self) -> Result<HttpResponse, ClientError> {
        self.as_xml().accept_xml().execute()
    }

    fn append(mut self, name: &'static str, value: &str) -> Self {
        self.request.headers.append(HttpHeader::trusted(name, value));
        self
    }

    fn append_checked(self, name: &'static str, value: &str, field: &str) -> Result<Self, ClientError> {
        let value = not_blank(value, field)?;
        Ok(self.append(name, value))
    }

    fn replace(mut self, name: &'static str, value: &str) -> Self {
        self.request.headers.insert(HttpHeader::trusted(name, value));
        self
    }

    fn ensure_body_allowed(&self, operation: &'static str) -> Result<(), ClientError> {
        let method = self.request.method;
        if !method.is_body_allowed() {
            return Err(ClientError::UnsupportedOperation { method, operation });
        }
        Ok(())
    }
}

impl<T: Transport + ?Sized> fmt::Debug for RequestBuilder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

fn non_empty<I>(params: I) -> Result<Vec<HttpParameter>, ClientError>
where
    I: IntoIterator<Item = HttpParameter>,
{
    let params: Vec<HttpParameter> = params.into_iter().collect();
    if params.is_empty() {
        return Err(ClientError::Validation("parameters must not be empty".to_string()));
    }
    Ok(params)
}
