//! The immutable record of one API interaction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{ApiRequest, ApiResponse};
use crate::error::{ApiError, ParseError};

/// The Contentful API a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Api {
    /// The Content Delivery API.
    Delivery,
    /// The Content Preview API.
    Preview,
    /// The Content Management API.
    Management,
}

impl Api {
    /// The canonical tag for this API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Api::Delivery => "DELIVERY",
            Api::Preview => "PREVIEW",
            Api::Management => "MANAGEMENT",
        }
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Api {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DELIVERY" => Ok(Api::Delivery),
            "PREVIEW" => Ok(Api::Preview),
            "MANAGEMENT" => Ok(Api::Management),
            other => Err(ParseError::UnknownApi {
                value: other.to_string(),
            }),
        }
    }
}

/// An immutable, serializable envelope pairing a request with its outcome.
///
/// Messages are what the client logs and stores in its history: the API
/// tag, the elapsed duration, the request, and either the response or the
/// classified error (or both, since API errors usually carry a response).
///
/// A message round-trips through [`Message::as_string`] and
/// [`Message::from_string`]; the request URI scheme is not carried on the
/// wire and defaults to `https` on reconstruction.
#[derive(Debug, Clone)]
pub struct Message {
    api: Api,
    duration: f64,
    request: ApiRequest,
    response: Option<ApiResponse>,
    error: Option<ApiError>,
}

#[derive(Serialize, Deserialize)]
struct MessageRecord {
    api: String,
    duration: f64,
    request: String,
    response: Option<String>,
    exception: Option<String>,
}

impl Message {
    /// Create a new message.
    pub fn new(
        api: Api,
        duration: f64,
        request: ApiRequest,
        response: Option<ApiResponse>,
        error: Option<ApiError>,
    ) -> Self {
        Self {
            api,
            duration,
            request,
            response,
            error,
        }
    }

    /// The API this exchange was made against.
    pub fn api(&self) -> Api {
        self.api
    }

    /// The elapsed duration of the exchange, in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// The request that was sent.
    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    /// The response, if one was received.
    pub fn response(&self) -> Option<&ApiResponse> {
        self.response.as_ref()
    }

    /// The classified error, if the exchange failed.
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// True if the exchange produced an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The level this message should be logged at.
    pub fn log_level(&self) -> tracing::Level {
        if self.is_error() {
            tracing::Level::ERROR
        } else {
            tracing::Level::INFO
        }
    }

    /// Serializes this message to its JSON string form.
    pub fn as_string(&self) -> String {
        let record = MessageRecord {
            api: self.api.as_str().to_string(),
            duration: self.duration,
            request: self.request.to_wire(),
            response: self.response.as_ref().map(ApiResponse::to_wire),
            exception: self.error.as_ref().map(ApiError::to_blob),
        };

        serde_json::to_string(&record).expect("message record serialization cannot fail")
    }

    /// Reconstructs a message from its JSON string form.
    ///
    /// # Errors
    ///
    /// Fails if the string is not valid JSON, if any of the required
    /// fields (`api`, `duration`, `request`, `response`, `exception`) is
    /// missing, or if a wire dump inside the record is malformed.
    pub fn from_string(json: &str) -> Result<Self, ParseError> {
        let data: Value = serde_json::from_str(json)?;

        let required = ["api", "duration", "request", "response", "exception"];
        let complete = data.is_object() && required.iter().all(|key| data.get(key).is_some());
        if !complete {
            return Err(ParseError::MissingMessageFields);
        }

        let record: MessageRecord = serde_json::from_value(data)?;

        Ok(Self {
            api: record.api.parse()?,
            duration: record.duration,
            request: ApiRequest::from_wire(&record.request)?,
            response: record
                .response
                .as_deref()
                .map(ApiResponse::from_wire)
                .transpose()?,
            error: record
                .exception
                .as_deref()
                .map(ApiError::from_blob)
                .transpose()?,
        })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use url::Url;

    fn request() -> ApiRequest {
        ApiRequest::new(
            Method::GET,
            Url::parse("https://cdn.contentful.com/spaces/cfexampleapi").unwrap(),
            vec![("Authorization".to_string(), "Bearer token".to_string())],
            None,
        )
    }

    fn response() -> ApiResponse {
        ApiResponse::new(
            200,
            vec![("Content-Type".to_string(), "application/json".to_string())],
            "{\"sys\":{\"type\":\"Space\"}}",
        )
    }

    #[test]
    fn api_tags_parse_and_print() {
        for api in [Api::Delivery, Api::Preview, Api::Management] {
            assert_eq!(api.as_str().parse::<Api>().unwrap(), api);
        }
    }

    #[test]
    fn unknown_api_tag_is_rejected() {
        assert!(matches!(
            "OBSERVATION".parse::<Api>(),
            Err(ParseError::UnknownApi { .. })
        ));
    }

    #[test]
    fn log_level_follows_error_presence() {
        let success = Message::new(Api::Delivery, 0.1, request(), Some(response()), None);
        assert_eq!(success.log_level(), tracing::Level::INFO);
        assert!(!success.is_error());
    }

    #[test]
    fn round_trip_preserves_logical_content() {
        let message = Message::new(Api::Delivery, 0.415, request(), Some(response()), None);

        let rebuilt = Message::from_string(&message.as_string()).unwrap();

        assert_eq!(rebuilt.api(), Api::Delivery);
        assert_eq!(rebuilt.duration(), 0.415);
        assert_eq!(rebuilt.request(), message.request());
        assert_eq!(rebuilt.response(), message.response());
        assert!(rebuilt.error().is_none());
    }

    #[test]
    fn round_trip_without_response() {
        let message = Message::new(Api::Management, 1.5, request(), None, None);

        let rebuilt = Message::from_string(&message.as_string()).unwrap();

        assert!(rebuilt.response().is_none());
        assert_eq!(rebuilt.api(), Api::Management);
    }

    #[test]
    fn missing_fields_fail_loudly() {
        let result = Message::from_string("{\"api\":\"DELIVERY\",\"duration\":0.1}");

        assert!(matches!(result, Err(ParseError::MissingMessageFields)));
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(Message::from_string("not json").is_err());
    }
}
