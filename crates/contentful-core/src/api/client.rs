//! The base client that concrete SDK clients build on.

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::JsonObject;
use crate::api::{
    Api, ErrorRegistry, Message, RequestBuilder, RequestOptions, Requester, UserAgentGenerator,
};
use crate::error::{Error, ErrorKind, ParseError};
use crate::transport::{HttpTransport, ReqwestTransport};

/// Version reported when a concrete SDK does not supply its own.
pub const FALLBACK_SDK_VERSION: &str = "0.0.0-alpha";

/// An application built on top of a Contentful SDK, identified in the
/// `X-Contentful-User-Agent` header.
pub trait Application {
    /// The application name.
    fn name(&self) -> String;

    /// The application version.
    fn version(&self) -> String;
}

/// A third-party integration wrapping a Contentful SDK, identified in the
/// `X-Contentful-User-Agent` header.
pub trait Integration {
    /// The integration name.
    fn name(&self) -> String;

    /// The integration version.
    fn version(&self) -> String;
}

/// Configuration for a [`BaseClient`].
///
/// The required facts are what other SDKs supply through abstract
/// methods: which API is being talked to, the credentials, the host, the
/// content type, and the SDK identity. Everything else has defaults.
pub struct ClientConfig {
    api: Api,
    access_token: String,
    host: String,
    api_content_type: String,
    sdk_name: String,
    sdk_version: Option<String>,
    save_messages: bool,
    transport: Option<Arc<dyn HttpTransport>>,
    errors: ErrorRegistry,
}

impl ClientConfig {
    /// Create a configuration with the required identity facts.
    pub fn new(
        api: Api,
        access_token: impl Into<String>,
        host: impl Into<String>,
        api_content_type: impl Into<String>,
        sdk_name: impl Into<String>,
    ) -> Self {
        Self {
            api,
            access_token: access_token.into(),
            host: host.into(),
            api_content_type: api_content_type.into(),
            sdk_name: sdk_name.into(),
            sdk_version: None,
            save_messages: true,
            transport: None,
            errors: ErrorRegistry::new(),
        }
    }

    /// Set the SDK version, normally `env!("CARGO_PKG_VERSION")` of the
    /// concrete SDK crate. Falls back to [`FALLBACK_SDK_VERSION`].
    pub fn sdk_version(mut self, version: impl Into<String>) -> Self {
        self.sdk_version = Some(version.into());
        self
    }

    /// Replace the default transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Register a domain-specific error kind for an API error identifier.
    pub fn register_error(mut self, error_id: impl Into<String>, kind: ErrorKind) -> Self {
        self.errors.register(error_id, kind);
        self
    }

    /// Control whether messages are retained in the client history.
    pub fn save_messages(mut self, save: bool) -> Self {
        self.save_messages = save;
        self
    }
}

/// The orchestrator every concrete Contentful client is built on.
///
/// Owns the request builder, the requester, the user-agent identity, and
/// the per-instance message history. One [`BaseClient::call_api`] call
/// performs exactly one network round-trip; there are no retries.
///
/// The message history grows unboundedly while `save_messages` is on;
/// call [`BaseClient::clear_messages`] to reset it.
pub struct BaseClient {
    api: Api,
    request_builder: RequestBuilder,
    requester: Requester,
    user_agent: Arc<Mutex<UserAgentGenerator>>,
    messages: Mutex<Vec<Message>>,
    save_messages: bool,
}

impl BaseClient {
    /// Create a client from its configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configured host is not a valid absolute URI.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let host = config.host.trim_end_matches('/');
        let version = config
            .sdk_version
            .unwrap_or_else(|| FALLBACK_SDK_VERSION.to_string());

        let user_agent = Arc::new(Mutex::new(UserAgentGenerator::new(
            &config.sdk_name,
            &version,
        )));

        let request_builder = RequestBuilder::new(
            config.access_token,
            host,
            config.api_content_type,
            user_agent.clone(),
        )?;

        let transport = config
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));
        let requester = Requester::new(transport, config.api, config.errors);

        Ok(Self {
            api: config.api,
            request_builder,
            requester,
            user_agent,
            messages: Mutex::new(Vec::new()),
            save_messages: config.save_messages,
        })
    }

    /// The API this client talks to.
    pub fn api(&self) -> Api {
        self.api
    }

    /// Performs one API call and returns the decoded response body.
    ///
    /// The exchange is recorded in the message history (when enabled) and
    /// logged twice: a one-line summary at the message's level, and the
    /// full serialized message at debug level. An empty response body
    /// decodes to an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] for errors the API reported,
    /// [`Error::Transport`] for failures that never produced a response,
    /// and [`Error::Parse`] for malformed inputs or bodies.
    #[instrument(skip(self, options), fields(api = %self.api))]
    pub async fn call_api(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<JsonObject, Error> {
        let request = self.request_builder.build(method, path, &options)?;
        let message = self.requester.send_request(request).await?;

        if self.save_messages {
            self.lock_messages().push(message.clone());
        }

        let summary = format!(
            "{} {} ({:.3}s)",
            message.request().method(),
            message.request().url(),
            message.duration(),
        );
        if message.log_level() == tracing::Level::ERROR {
            error!("{}", summary);
        } else {
            info!("{}", summary);
        }
        debug!(message = %message.as_string(), "API call details");

        if let Some(api_error) = message.error() {
            return Err(api_error.clone().into());
        }

        let body = message.response().map(|r| r.body()).unwrap_or_default();
        decode_body(body)
    }

    /// The messages recorded so far.
    pub fn messages(&self) -> Vec<Message> {
        self.lock_messages().clone()
    }

    /// Clears the message history.
    pub fn clear_messages(&self) {
        self.lock_messages().clear();
    }

    /// Set the application name and version sent in the
    /// `X-Contentful-User-Agent` header.
    pub fn set_application(&self, name: Option<&str>, version: Option<&str>) {
        self.lock_user_agent().set_application(name, version);
    }

    /// Set the integration name and version sent in the
    /// `X-Contentful-User-Agent` header.
    pub fn set_integration(&self, name: Option<&str>, version: Option<&str>) {
        self.lock_user_agent().set_integration(name, version);
    }

    /// Identify the application through its capability object.
    pub fn use_application(&self, application: &dyn Application) {
        let name = application.name();
        let version = application.version();
        self.set_application(
            Some(name.as_str()),
            (!version.is_empty()).then_some(version.as_str()),
        );
    }

    /// Identify the integration through its capability object.
    pub fn use_integration(&self, integration: &dyn Integration) {
        let name = integration.name();
        let version = integration.version();
        self.set_integration(
            Some(name.as_str()),
            (!version.is_empty()).then_some(version.as_str()),
        );
    }

    fn lock_messages(&self) -> std::sync::MutexGuard<'_, Vec<Message>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_user_agent(&self) -> std::sync::MutexGuard<'_, UserAgentGenerator> {
        self.user_agent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Decodes a response body into a JSON object; empty bodies decode to an
/// empty map.
fn decode_body(body: &str) -> Result<JsonObject, Error> {
    if body.trim().is_empty() {
        return Ok(JsonObject::new());
    }

    match serde_json::from_str::<Value>(body).map_err(ParseError::from)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(JsonObject::new()),
        _ => Err(ParseError::NonObjectBody.into()),
    }
}
