//! Error types for the request builder and response contract.
//!
//! # Design
//! Argument problems are reported eagerly, at the fluent call that received
//! them, so a malformed request never reaches the network. Anything that goes
//! wrong while the transport runs lands in the single `HttpClient` variant,
//! which keeps the original failure as its `source()`.
//!
//! Lifecycle failures are not represented here: `ServerRule` surfaces the
//! embedded server's own error type untouched.

use thiserror::Error;

use crate::http::HttpMethod;

/// Boxed error returned by a [`Transport`](crate::Transport) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned while building, executing or reading an HTTP exchange.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// A required argument was blank or empty.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// The operation cannot be applied to a request using this HTTP method.
    #[error("HTTP method {method} does not support {operation}")]
    UnsupportedOperation {
        method: HttpMethod,
        operation: &'static str,
    },

    /// The transport failed while executing the request.
    #[error("HTTP request failed: {source}")]
    HttpClient {
        #[source]
        source: BoxError,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Wrap a transport failure.
    pub fn http_client(source: impl Into<BoxError>) -> Self {
        ClientError::HttpClient {
            source: source.into(),
        }
    }
}

/// Reject blank (empty or whitespace-only) arguments.
pub(crate) fn not_blank<'a>(value: &'a str, field: &str) -> Result<&'a str, ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation(format!("{field} must not be blank")));
    }
    Ok(value)
}
