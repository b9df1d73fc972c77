//! Well-known header names, media types and the conditional-date format.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ClientError;

pub const ACCEPT: &str = "Accept";
pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
pub const ACCEPT_LANGUAGE: &str = "Accept-Language";
pub const CACHE_CONTROL: &str = "Cache-Control";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const COOKIE: &str = "Cookie";
pub const ETAG: &str = "ETag";
pub const IF_MATCH: &str = "If-Match";
pub const IF_MODIFIED_SINCE: &str = "If-Modified-Since";
pub const IF_NONE_MATCH: &str = "If-None-Match";
pub const IF_UNMODIFIED_SINCE: &str = "If-Unmodified-Since";
pub const LOCATION: &str = "Location";
pub const ORIGIN: &str = "Origin";
pub const REFERER: &str = "Referer";
pub const USER_AGENT: &str = "User-Agent";
pub const X_CSRF_TOKEN: &str = "X-CSRF-Token";
pub const X_HTTP_METHOD_OVERRIDE: &str = "X-HTTP-Method-Override";
pub const X_REQUESTED_WITH: &str = "X-Requested-With";

/// Marker sent in `X-Requested-With` by browser XHR calls.
pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_XML: &str = "application/xml";
pub const APPLICATION_FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Value sent by `accept_gzip`.
pub const GZIP_DEFLATE: &str = "gzip, deflate";

/// Format a timestamp for `If-Modified-Since` / `If-Unmodified-Since`.
///
/// The output always follows `EEE, dd MMM yyyy HH:mm:ss zzz` in GMT, e.g.
/// `Wed, 21 Oct 2015 07:28:00 GMT`. Sub-second precision is truncated.
///
/// The format has a four digit year after 1970, so times before the epoch or
/// from year 10000 on fail with [`ClientError::Validation`].
pub fn http_date(time: SystemTime) -> Result<String, ClientError> {
    let since_epoch = time
        .duration_since(UNIX_EPOCH)
        .map_err(|_| ClientError::Validation("date must not be before 1970-01-01".to_string()))?;
    if since_epoch.as_secs() >= HTTP_DATE_LIMIT_SECS {
        return Err(ClientError::Validation("date must be before year 10000".to_string()));
    }
    Ok(httpdate::fmt_http_date(time))
}

/// `10000-01-01T00:00:00Z`, the first instant an HTTP date cannot express.
const HTTP_DATE_LIMIT_SECS: u64 = 253_402_300_800;
