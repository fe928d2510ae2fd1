//! Construction of outbound requests.

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::Method;
use url::Url;

use crate::api::http::serialize_query;
use crate::api::{ApiRequest, UserAgentGenerator};
use crate::error::Error;

/// Optional parameters for a single API call.
///
/// Only the keys the pipeline recognizes exist here: a raw `body`, `query`
/// parameters, extra `headers` (which win over the defaults), and a
/// per-call `host` override.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    body: Option<String>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    host: Option<String>,
}

impl RequestOptions {
    /// Create an empty options bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw request body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append one query parameter.
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Replace the query parameters wholesale.
    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    /// Add a header; caller-supplied headers override the defaults.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Override the client's base host for this call only.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }
}

/// Builds fully-formed [`ApiRequest`] values from a method, a path, and a
/// [`RequestOptions`] bag. Performs no I/O.
#[derive(Debug)]
pub struct RequestBuilder {
    access_token: String,
    base_uri: Url,
    api_content_type: String,
    user_agent: Arc<Mutex<UserAgentGenerator>>,
}

impl RequestBuilder {
    /// Create a builder for the given credentials and base host.
    pub fn new(
        access_token: impl Into<String>,
        base_uri: &str,
        api_content_type: impl Into<String>,
        user_agent: Arc<Mutex<UserAgentGenerator>>,
    ) -> Result<Self, Error> {
        let base_uri = Url::parse(base_uri).map_err(crate::error::ParseError::from)?;

        Ok(Self {
            access_token: access_token.into(),
            base_uri,
            api_content_type: api_content_type.into(),
            user_agent,
        })
    }

    /// Builds one request.
    ///
    /// The path resolves against the per-call host override when present,
    /// the configured base host otherwise; an absolute path wins outright.
    pub fn build(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<ApiRequest, Error> {
        let uri = self.uri(path, options.host.as_deref(), &options.query)?;
        let headers = self.headers(&options.headers, options.body.is_some());

        Ok(ApiRequest::new(method, uri, headers, options.body.clone()))
    }

    fn uri(&self, path: &str, host: Option<&str>, query: &[(String, String)]) -> Result<Url, Error> {
        let base = match host {
            Some(host) => Url::parse(host).map_err(crate::error::ParseError::from)?,
            None => self.base_uri.clone(),
        };

        let mut uri = base.join(path).map_err(crate::error::ParseError::from)?;

        if !query.is_empty() {
            let serialized =
                serialize_query(query.iter().map(|(n, v)| (n.as_str(), v.as_str())));
            uri.set_query(Some(&serialized));
        }

        Ok(uri)
    }

    fn headers(&self, user_headers: &[(String, String)], has_body: bool) -> Vec<(String, String)> {
        let user_agent = self
            .user_agent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .user_agent();

        let mut headers = vec![
            ("X-Contentful-User-Agent".to_string(), user_agent),
            ("Accept".to_string(), self.api_content_type.clone()),
            ("Accept-Encoding".to_string(), "gzip".to_string()),
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.access_token),
            ),
        ];

        if has_body {
            headers.push(("Content-Type".to_string(), self.api_content_type.clone()));
        }

        // Caller-supplied headers win over the defaults.
        for (name, value) in user_headers {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }

        headers
    }
}
