//! Diagnostic HTTP application used to exercise the harness over real sockets.
//!
//! # Routes
//! - `ANY /echo` reflects method, path, query, headers and body as JSON.
//! - `GET /status/{code}` answers with an empty body and that status.
//! - `GET|PUT|POST /resource` is a single cacheable resource with validators.
//! - `GET /cookies` returns the request cookies as a JSON map.
//! - `GET /json` only answers clients that accept JSON.
//! - `GET /delay/{millis}` answers after sleeping.

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{OriginalUri, Path, Query},
    http::{header, HeaderMap, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use cookie::Cookie;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

mod server;

pub use server::MockServer;

/// Current entity tag of `/resource`.
pub const RESOURCE_ETAG: &str = "\"v1\"";

/// Seconds since the epoch of the last change to `/resource`
/// (`Wed, 21 Oct 2015 07:28:00 GMT`).
pub const RESOURCE_LAST_MODIFIED_SECS: u64 = 1_445_412_480;

/// What `/echo` saw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Lower-cased header names, values in arrival order.
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: String,
}

impl Echo {
    /// All values received for `name` (case-insensitive).
    pub fn header(&self, name: &str) -> &[String] {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", get(status))
        .route(
            "/resource",
            get(get_resource).put(put_resource).post(create_resource),
        )
        .route("/cookies", get(cookies))
        .route("/json", get(json))
        .route("/delay/{millis}", get(delay))
}

/// [`app`] mounted under `path`.
pub fn router(path: &str) -> Router {
    match path.trim_end_matches('/') {
        "" => app(),
        prefix => Router::new().nest(prefix, app()),
    }
}

pub async fn run(listener: TcpListener, path: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, router(path)).await
}

pub fn resource_last_modified() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(RESOURCE_LAST_MODIFIED_SECS)
}

async fn echo(
    method: Method,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    let mut seen: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in &headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        seen.entry(name.as_str().to_string()).or_default().push(value);
    }

    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        headers: seen,
        body,
    })
}

async fn status(Path(code): Path<u16>) -> Result<StatusCode, StatusCode> {
    StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)
}

fn validators() -> [(HeaderName, String); 3] {
    [
        (header::ETAG, RESOURCE_ETAG.to_string()),
        (header::CACHE_CONTROL, "no-cache".to_string()),
        (
            header::LAST_MODIFIED,
            httpdate::fmt_http_date(resource_last_modified()),
        ),
    ]
}

/// `true` when a comma separated entity-tag list names the current tag.
/// Weak comparison: `W/"v1"` matches `"v1"`.
pub fn etag_matches(list: &str) -> bool {
    list.split(',')
        .map(str::trim)
        .any(|tag| tag == "*" || tag.trim_start_matches("W/") == RESOURCE_ETAG)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn is_fresh(headers: &HeaderMap) -> bool {
    // If-None-Match wins over If-Modified-Since when both are sent.
    if let Some(tags) = header_str(headers, &header::IF_NONE_MATCH) {
        return etag_matches(tags);
    }
    header_str(headers, &header::IF_MODIFIED_SINCE)
        .and_then(|since| httpdate::parse_http_date(since).ok())
        .is_some_and(|since| since >= resource_last_modified())
}

async fn get_resource(headers: HeaderMap) -> Response {
    if is_fresh(&headers) {
        return (StatusCode::NOT_MODIFIED, validators()).into_response();
    }
    (StatusCode::OK, validators(), "resource v1").into_response()
}

async fn put_resource(headers: HeaderMap) -> StatusCode {
    match header_str(&headers, &header::IF_MATCH) {
        Some(tags) if !etag_matches(tags) => StatusCode::PRECONDITION_FAILED,
        _ => StatusCode::NO_CONTENT,
    }
}

async fn create_resource() -> impl IntoResponse {
    (StatusCode::CREATED, [(header::LOCATION, "/resource")])
}

async fn cookies(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    let jar = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
        .collect();
    Json(jar)
}

async fn json(headers: HeaderMap) -> Response {
    let accepts_json = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("application/json"));
    if !accepts_json {
        return StatusCode::NOT_ACCEPTABLE.into_response();
    }
    Json(serde_json::json!({ "hello": "world" })).into_response()
}

async fn delay(Path(millis): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    "done"
}
