//! Error types for gated-content
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (route resolution, unlock fetch, access control)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for gated-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for gated-content
///
/// Every variant carries enough context to produce a useful diagnostic. Inside the
/// resolver these are logged and swallowed; at the HTTP boundary they become
/// JSON error responses.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "gate.unlock_endpoint")
        key: Option<String>,
    },

    /// The static path for the requested route has not been generated yet
    #[error("route not ready: static path has not been generated yet")]
    RouteNotReady,

    /// No article exists for the requested slug
    #[error("article not found: {slug}")]
    ArticleMissing {
        /// The slug that was looked up
        slug: String,
    },

    /// The unlock fetch failed (transport, status, or payload)
    #[error("unlock request failed: {0}")]
    UnlockRequestFailed(#[from] UnlockError),

    /// The supplied access token was not accepted
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The request body or parameters were invalid
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Ways an unlock fetch can fail
///
/// The resolver treats all of these identically (the view stays gated); the
/// distinction only matters for diagnostics.
#[derive(Debug, Error)]
pub enum UnlockError {
    /// The request never produced a response (connect, timeout, TLS, ...)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status
    #[error("endpoint returned {status}: {message}")]
    Status {
        /// HTTP status code returned by the endpoint
        status: u16,
        /// The `message` field of the error payload, or the raw body
        message: String,
        /// Machine-readable error kind, when the endpoint supplies one
        code: Option<String>,
    },

    /// The response body could not be decoded
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// API error response format
///
/// Returned by API endpoints other than the unlock endpoint, which keeps the
/// flat `{ "message": ... }` payload its clients expect.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "article_missing",
///     "message": "article not found: hello-world",
///     "details": {
///       "slug": "hello-world"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "article_missing", "access_denied")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::Config { .. } => 400,
            Error::InvalidRequest(_) => 400,

            // 401 Unauthorized - token rejected
            Error::AccessDenied(_) => 401,

            // 404 Not Found
            Error::ArticleMissing { .. } => 404,

            // 503 Service Unavailable - route still being generated
            Error::RouteNotReady => 503,

            // 502 Bad Gateway - upstream unlock endpoint failed
            Error::UnlockRequestFailed(_) => 502,

            // 500 Internal Server Error
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::RouteNotReady => "route_not_ready",
            Error::ArticleMissing { .. } => "article_missing",
            Error::UnlockRequestFailed(e) => match e {
                UnlockError::Transport(_) => "unlock_transport_error",
                UnlockError::Status { .. } => "unlock_status_error",
                UnlockError::MalformedPayload(_) => "unlock_malformed_payload",
            },
            Error::AccessDenied(_) => "access_denied",
            Error::InvalidRequest(_) => "invalid_request",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::ArticleMissing { slug } => Some(serde_json::json!({
                "slug": slug,
            })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            Error::UnlockRequestFailed(UnlockError::Status { status, .. }) => {
                Some(serde_json::json!({
                    "upstream_status": status,
                }))
            }
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
