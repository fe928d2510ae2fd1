//! Error types for the contentful-core library.
//!
//! This module provides a unified error type with explicit variants for
//! transport failures, classified API errors, resource building faults,
//! and wire-format parse errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{ApiRequest, ApiResponse};

/// The unified error type for contentful-core operations.
///
/// Transport errors are failures that never produced a usable HTTP
/// response; [`ApiError`] covers everything the API itself reported.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Errors reported by the API, classified by their error identifier.
    #[error("API error: {0}")]
    Api(Box<ApiError>),

    /// Resource building errors (unknown system type, unregistered mapper).
    #[error("resource builder error: {0}")]
    Builder(#[from] BuilderError),

    /// Parse errors (malformed wire dumps, invalid message records).
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl From<ApiError> for Error {
    fn from(error: ApiError) -> Self {
        Error::Api(Box::new(error))
    }
}

/// Transport-level errors.
///
/// The `Status` variant is internal plumbing: the default transport
/// surfaces any non-success status through it, and the requester turns it
/// into a classified [`ApiError`]. The other variants never carry a
/// response and propagate to the caller unmodified.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-success status code.
    #[error("server returned status {}", .response.status())]
    Status {
        /// The response attached to the failure.
        response: ApiResponse,
    },

    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

/// The classification of an [`ApiError`].
///
/// This replaces the exception subclasses of other Contentful SDKs with a
/// closed set of kinds. Identifiers without a registered kind resolve to
/// [`ErrorKind::Generic`]; downstream SDKs register their own identifiers
/// as [`ErrorKind::Custom`] values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request was malformed or missed required parameters.
    BadRequest,
    /// The access token was not accepted by the API.
    AccessTokenInvalid,
    /// The query could not be executed.
    InvalidQuery,
    /// The error response body could not be understood.
    InvalidResponseBody,
    /// The requested resource does not exist.
    NotFound,
    /// Too many requests.
    RateLimitExceeded,
    /// Fallback for identifiers with no registered kind.
    Generic,
    /// A kind registered by a downstream SDK.
    Custom(String),
}

impl ErrorKind {
    /// The wire tag for this kind, matching the API's `sys.id` values.
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::AccessTokenInvalid => "AccessTokenInvalid",
            ErrorKind::InvalidQuery => "InvalidQuery",
            ErrorKind::InvalidResponseBody => "InvalidResponseBody",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::RateLimitExceeded => "RateLimitExceeded",
            ErrorKind::Generic => "Generic",
            ErrorKind::Custom(name) => name,
        }
    }

    pub(crate) fn from_tag(tag: &str) -> Self {
        match tag {
            "BadRequest" => ErrorKind::BadRequest,
            "AccessTokenInvalid" => ErrorKind::AccessTokenInvalid,
            "InvalidQuery" => ErrorKind::InvalidQuery,
            "InvalidResponseBody" => ErrorKind::InvalidResponseBody,
            "NotFound" => ErrorKind::NotFound,
            "RateLimitExceeded" => ErrorKind::RateLimitExceeded,
            "Generic" => ErrorKind::Generic,
            other => ErrorKind::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error reported by the Contentful API.
///
/// Carries the request that triggered it, the response the API attached
/// (if any), and the `X-Contentful-Request-Id` correlation identifier so
/// operators can cross-reference server-side logs. The human-readable
/// message prefers the API-provided `message` field over the transport's
/// own failure description.
#[derive(Debug, Clone)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    request: ApiRequest,
    response: Option<ApiResponse>,
    request_id: Option<String>,
    rate_limit_reset: Option<u64>,
}

#[derive(Serialize, Deserialize)]
struct ApiErrorRecord {
    kind: String,
    message: String,
    request_id: Option<String>,
    rate_limit_reset: Option<u64>,
    request: String,
    response: Option<String>,
}

impl ApiError {
    /// Create a new API error from a failed exchange.
    ///
    /// `fallback_message` is used when the response body carries no
    /// `message` field.
    pub fn new(
        kind: ErrorKind,
        fallback_message: &str,
        request: ApiRequest,
        response: Option<ApiResponse>,
    ) -> Self {
        let request_id = response
            .as_ref()
            .and_then(|r| r.header("X-Contentful-Request-Id"))
            .map(str::to_string);

        let message = response
            .as_ref()
            .and_then(|r| api_message(r.body()))
            .unwrap_or_else(|| fallback_message.to_string());

        let rate_limit_reset = if kind == ErrorKind::RateLimitExceeded {
            response
                .as_ref()
                .and_then(|r| r.header("X-Contentful-RateLimit-Reset"))
                .and_then(|v| v.trim().parse().ok())
        } else {
            None
        };

        Self {
            kind,
            message,
            request,
            response,
            request_id,
            rate_limit_reset,
        }
    }

    /// The classification of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The request that caused the error.
    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    /// The response the API attached to the error, if any.
    pub fn response(&self) -> Option<&ApiResponse> {
        self.response.as_ref()
    }

    /// Whether a response was received.
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    /// The `X-Contentful-Request-Id` correlation identifier, if present.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Seconds until the rate limit resets.
    ///
    /// Only populated for [`ErrorKind::RateLimitExceeded`] errors.
    pub fn rate_limit_reset(&self) -> Option<u64> {
        self.rate_limit_reset
    }

    /// Serializes this error to an opaque blob for message persistence.
    pub(crate) fn to_blob(&self) -> String {
        let record = ApiErrorRecord {
            kind: self.kind.as_str().to_string(),
            message: self.message.clone(),
            request_id: self.request_id.clone(),
            rate_limit_reset: self.rate_limit_reset,
            request: self.request.to_wire(),
            response: self.response.as_ref().map(ApiResponse::to_wire),
        };

        serde_json::to_string(&record).expect("error record serialization cannot fail")
    }

    /// Reconstructs an error from a blob produced by [`ApiError::to_blob`].
    pub(crate) fn from_blob(blob: &str) -> Result<Self, ParseError> {
        let record: ApiErrorRecord = serde_json::from_str(blob)?;

        Ok(Self {
            kind: ErrorKind::from_tag(&record.kind),
            message: record.message,
            request: ApiRequest::from_wire(&record.request)?,
            response: record
                .response
                .as_deref()
                .map(ApiResponse::from_wire)
                .transpose()?,
            request_id: record.request_id,
            rate_limit_reset: record.rate_limit_reset,
        })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

/// Extracts the API-provided error message from a response body.
fn api_message(body: &str) -> Option<String> {
    let data: serde_json::Value = serde_json::from_str(body).ok()?;
    data.get("message")?.as_str().map(str::to_string)
}

/// Resource building errors.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// The payload carries no recognizable system type.
    #[error("data does not contain a recognizable system type")]
    MissingSystemType,

    /// A matcher redirected to a mapper that was never registered, or no
    /// mapper is registered for the resolved identifier.
    #[error("mapper \"{name}\" is not registered")]
    UnknownMapper { name: String },
}

/// Wire-format and record parse errors.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A request wire dump could not be parsed.
    #[error("malformed request dump: {reason}")]
    Request { reason: String },

    /// A response wire dump could not be parsed.
    #[error("malformed response dump: {reason}")]
    Response { reason: String },

    /// A message record parsed as JSON but misses required fields.
    #[error("message record is valid JSON but does not contain required fields")]
    MissingMessageFields,

    /// An API tag outside the known set.
    #[error("unknown API value \"{value}\"")]
    UnknownApi { value: String },

    /// A response body that should be a JSON object is not one.
    #[error("response body is not a JSON object")]
    NonObjectBody,

    /// Invalid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URI.
    #[error("invalid URI: {0}")]
    Uri(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_tags_round_trip() {
        let kinds = [
            ErrorKind::BadRequest,
            ErrorKind::AccessTokenInvalid,
            ErrorKind::InvalidQuery,
            ErrorKind::InvalidResponseBody,
            ErrorKind::NotFound,
            ErrorKind::RateLimitExceeded,
            ErrorKind::Generic,
            ErrorKind::Custom("VersionMismatch".to_string()),
        ];

        for kind in kinds {
            assert_eq!(ErrorKind::from_tag(kind.as_str()), kind);
        }
    }

    #[test]
    fn unknown_tag_becomes_custom() {
        assert_eq!(
            ErrorKind::from_tag("SomethingElse"),
            ErrorKind::Custom("SomethingElse".to_string())
        );
    }
}
