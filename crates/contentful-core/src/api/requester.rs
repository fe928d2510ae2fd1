//! Request execution and error classification.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::api::{Api, ApiRequest, ApiResponse, Message};
use crate::error::{ApiError, ErrorKind, TransportError};
use crate::transport::HttpTransport;

/// Sentinel identifier used when an error body cannot be understood.
const INVALID_RESPONSE_BODY: &str = "InvalidResponseBody";

/// Resolution of API error identifiers to [`ErrorKind`] values.
///
/// Downstream SDKs register their own identifiers here; registered
/// entries are consulted before the built-in table, and identifiers
/// known to neither resolve to [`ErrorKind::Generic`].
#[derive(Debug, Clone, Default)]
pub struct ErrorRegistry {
    custom: HashMap<String, ErrorKind>,
}

impl ErrorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind for the given error identifier, overriding the
    /// built-in classification for that identifier.
    pub fn register(&mut self, error_id: impl Into<String>, kind: ErrorKind) {
        self.custom.insert(error_id.into(), kind);
    }

    /// Resolve an error identifier to its kind.
    pub fn resolve(&self, error_id: &str) -> ErrorKind {
        if let Some(kind) = self.custom.get(error_id) {
            return kind.clone();
        }

        match error_id {
            "BadRequest" => ErrorKind::BadRequest,
            "AccessTokenInvalid" => ErrorKind::AccessTokenInvalid,
            "InvalidQuery" => ErrorKind::InvalidQuery,
            "InvalidResponseBody" => ErrorKind::InvalidResponseBody,
            "NotFound" => ErrorKind::NotFound,
            "RateLimitExceeded" => ErrorKind::RateLimitExceeded,
            _ => ErrorKind::Generic,
        }
    }
}

/// Executes one request attempt through the injected transport and
/// classifies the outcome into a [`Message`].
pub struct Requester {
    transport: Arc<dyn HttpTransport>,
    api: Api,
    errors: ErrorRegistry,
}

impl Requester {
    /// Create a requester for the given API.
    pub fn new(transport: Arc<dyn HttpTransport>, api: Api, errors: ErrorRegistry) -> Self {
        Self {
            transport,
            api,
            errors,
        }
    }

    /// Sends the request, exactly once, and returns the timed outcome.
    ///
    /// A transport failure that carries a response is classified into an
    /// [`ApiError`] inside the returned message. A failure without one
    /// (connection refused, DNS, timeout) propagates unmodified and never
    /// becomes a message.
    #[instrument(skip(self, request), fields(api = %self.api, method = %request.method(), url = %request.url()))]
    pub async fn send_request(&self, request: ApiRequest) -> Result<Message, TransportError> {
        let start = Instant::now();

        let (response, error) = match self.transport.send(&request).await {
            Ok(response) => {
                trace!(status = response.status(), "request succeeded");
                (Some(response), None)
            }
            Err(TransportError::Status { response }) => {
                let error = self.classify(&request, &response);
                debug!(kind = %error.kind(), "classified API error");
                (Some(response), Some(error))
            }
            Err(other) => return Err(other),
        };

        let duration = start.elapsed().as_secs_f64();

        Ok(Message::new(self.api, duration, request, response, error))
    }

    /// Turns an error response into a typed [`ApiError`] by inspecting the
    /// body's `sys.id` identifier.
    fn classify(&self, request: &ApiRequest, response: &ApiResponse) -> ApiError {
        let error_id = error_identifier(response.body());
        let kind = self.errors.resolve(&error_id);

        let fallback_message = format!(
            "server returned status {} for \"{} {}\"",
            response.status(),
            request.method(),
            request.url(),
        );

        ApiError::new(kind, &fallback_message, request.clone(), Some(response.clone()))
    }
}

/// Extracts `sys.id` from an error body, falling back to the
/// [`INVALID_RESPONSE_BODY`] sentinel when the body is not a JSON object
/// or carries no string identifier.
fn error_identifier(body: &str) -> String {
    let identifier = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(data)) => data
            .get("sys")
            .and_then(|sys| sys.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };

    identifier.unwrap_or_else(|| INVALID_RESPONSE_BODY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_comes_from_sys_id() {
        assert_eq!(
            error_identifier("{\"sys\":{\"id\":\"NotFound\"},\"message\":\"nope\"}"),
            "NotFound"
        );
    }

    #[test]
    fn malformed_body_maps_to_sentinel() {
        assert_eq!(error_identifier("<html>nope</html>"), INVALID_RESPONSE_BODY);
        assert_eq!(error_identifier(""), INVALID_RESPONSE_BODY);
        assert_eq!(error_identifier("[1,2,3]"), INVALID_RESPONSE_BODY);
    }

    #[test]
    fn missing_or_non_string_identifier_maps_to_sentinel() {
        assert_eq!(error_identifier("{\"sys\":{}}"), INVALID_RESPONSE_BODY);
        assert_eq!(
            error_identifier("{\"sys\":{\"id\":42}}"),
            INVALID_RESPONSE_BODY
        );
    }

    #[test]
    fn registry_prefers_custom_entries() {
        let mut registry = ErrorRegistry::new();
        registry.register(
            "VersionMismatch",
            ErrorKind::Custom("VersionMismatch".to_string()),
        );
        registry.register("NotFound", ErrorKind::Custom("MyNotFound".to_string()));

        assert_eq!(
            registry.resolve("VersionMismatch"),
            ErrorKind::Custom("VersionMismatch".to_string())
        );
        // Custom entries shadow the built-in table.
        assert_eq!(
            registry.resolve("NotFound"),
            ErrorKind::Custom("MyNotFound".to_string())
        );
    }

    #[test]
    fn unregistered_identifier_falls_back_to_generic() {
        let registry = ErrorRegistry::new();

        assert_eq!(registry.resolve("SomethingNew"), ErrorKind::Generic);
        assert_eq!(registry.resolve("BadRequest"), ErrorKind::BadRequest);
    }
}
