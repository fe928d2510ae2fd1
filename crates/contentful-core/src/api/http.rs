//! Owned request/response snapshots and their HTTP/1.1 wire dumps.
//!
//! The pipeline works on these snapshots instead of transport-specific
//! types so that a [`Message`](crate::Message) can serialize a complete
//! record of an exchange and reconstruct it later.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use url::Url;

use crate::error::ParseError;

/// RFC 3986 strict encoding: everything but unreserved characters.
/// Spaces encode as `%20`, never `+`.
const QUERY_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Serializes name/value pairs into an RFC 3986 query string.
pub(crate) fn serialize_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(name, QUERY_ENCODE),
                utf8_percent_encode(value, QUERY_ENCODE)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// An immutable snapshot of one outbound HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl ApiRequest {
    /// Create a new request snapshot.
    pub fn new(
        method: Method,
        url: Url,
        headers: Vec<(String, String)>,
        body: Option<String>,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The fully-resolved request URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// All headers, in composition order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Looks up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_lookup(&self.headers, name)
    }

    /// The request body, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Dumps this request as a complete HTTP/1.1 wire string.
    pub fn to_wire(&self) -> String {
        let mut target = self.url.path().to_string();
        if let Some(query) = self.url.query() {
            target.push('?');
            target.push_str(query);
        }

        let mut wire = format!("{} {} HTTP/1.1\r\n", self.method, target);
        wire.push_str(&format!("Host: {}\r\n", host_with_port(&self.url)));
        for (name, value) in &self.headers {
            wire.push_str(&format!("{}: {}\r\n", name, value));
        }
        wire.push_str("\r\n");
        if let Some(body) = &self.body {
            wire.push_str(body);
        }

        wire
    }

    /// Parses a request from an HTTP/1.1 wire string.
    ///
    /// The wire format does not carry a scheme; parsing defaults to
    /// `https`. This is the accepted lossy corner of the message
    /// round-trip.
    pub fn from_wire(wire: &str) -> Result<Self, ParseError> {
        let (head, body) = split_head(wire);
        let mut lines = head.split("\r\n");

        let request_line = lines.next().unwrap_or("");
        let mut parts = request_line.split_whitespace();
        let method = parts
            .next()
            .and_then(|m| Method::from_bytes(m.as_bytes()).ok())
            .ok_or_else(|| ParseError::Request {
                reason: format!("invalid request line \"{}\"", request_line),
            })?;
        let target = parts.next().ok_or_else(|| ParseError::Request {
            reason: "missing request target".to_string(),
        })?;

        let mut host = None;
        let mut headers = Vec::new();
        for line in lines.filter(|l| !l.is_empty()) {
            let (name, value) = split_header(line).ok_or_else(|| ParseError::Request {
                reason: format!("invalid header line \"{}\"", line),
            })?;
            // The Host header is represented by the URL, not kept in the list.
            if name.eq_ignore_ascii_case("host") {
                host = Some(value.to_string());
            } else {
                headers.push((name.to_string(), value.to_string()));
            }
        }

        let host = host.ok_or_else(|| ParseError::Request {
            reason: "missing Host header".to_string(),
        })?;
        let url = Url::parse(&format!("https://{}{}", host, target))?;

        let body = if body.is_empty() {
            None
        } else {
            Some(body.to_string())
        };

        Ok(Self::new(method, url, headers, body))
    }
}

/// An immutable snapshot of one inbound HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: u16,
    reason: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl ApiResponse {
    /// Create a new response snapshot. The reason phrase is derived from
    /// the status code.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason_phrase(status).to_string(),
            headers,
            body: body.into(),
        }
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The reason phrase.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// All headers, in arrival order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Looks up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_lookup(&self.headers, name)
    }

    /// The response body; empty when the response carried none.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Dumps this response as a complete HTTP/1.1 wire string.
    pub fn to_wire(&self) -> String {
        let mut wire = format!("HTTP/1.1 {} {}\r\n", self.status, self.reason);
        for (name, value) in &self.headers {
            wire.push_str(&format!("{}: {}\r\n", name, value));
        }
        wire.push_str("\r\n");
        wire.push_str(&self.body);

        wire
    }

    /// Parses a response from an HTTP/1.1 wire string.
    pub fn from_wire(wire: &str) -> Result<Self, ParseError> {
        let (head, body) = split_head(wire);
        let mut lines = head.split("\r\n");

        let status_line = lines.next().unwrap_or("");
        let mut parts = status_line.splitn(3, ' ');
        let _version = parts.next();
        let status = parts
            .next()
            .and_then(|s| s.parse::<u16>().ok())
            .filter(|s| (100..=599).contains(s))
            .ok_or_else(|| ParseError::Response {
                reason: format!("invalid status line \"{}\"", status_line),
            })?;
        let reason = parts.next().unwrap_or("").to_string();

        let mut headers = Vec::new();
        for line in lines.filter(|l| !l.is_empty()) {
            let (name, value) = split_header(line).ok_or_else(|| ParseError::Response {
                reason: format!("invalid header line \"{}\"", line),
            })?;
            headers.push((name.to_string(), value.to_string()));
        }

        Ok(Self {
            status,
            reason,
            headers,
            body: body.to_string(),
        })
    }
}

fn header_lookup<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

fn split_head(wire: &str) -> (&str, &str) {
    match wire.split_once("\r\n\r\n") {
        Some((head, body)) => (head, body),
        None => (wire, ""),
    }
}

fn split_header(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}

fn host_with_port(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ApiRequest {
        ApiRequest::new(
            Method::POST,
            Url::parse("https://cdn.contentful.com/spaces/cfexampleapi/entries?limit=2").unwrap(),
            vec![
                ("Authorization".to_string(), "Bearer token".to_string()),
                (
                    "Content-Type".to_string(),
                    "application/vnd.contentful.delivery.v1+json".to_string(),
                ),
            ],
            Some("{\"fields\":{}}".to_string()),
        )
    }

    #[test]
    fn request_wire_dump() {
        let wire = request().to_wire();

        assert!(wire.starts_with("POST /spaces/cfexampleapi/entries?limit=2 HTTP/1.1\r\n"));
        assert!(wire.contains("Host: cdn.contentful.com\r\n"));
        assert!(wire.contains("Authorization: Bearer token\r\n"));
        assert!(wire.ends_with("\r\n\r\n{\"fields\":{}}"));
    }

    #[test]
    fn request_wire_round_trip() {
        let original = request();
        let parsed = ApiRequest::from_wire(&original.to_wire()).unwrap();

        assert_eq!(parsed, original);
    }

    #[test]
    fn request_wire_preserves_port() {
        let original = ApiRequest::new(
            Method::GET,
            Url::parse("https://localhost:8080/path").unwrap(),
            Vec::new(),
            None,
        );
        let parsed = ApiRequest::from_wire(&original.to_wire()).unwrap();

        assert_eq!(parsed.url().port(), Some(8080));
    }

    #[test]
    fn request_wire_missing_host_fails() {
        let result = ApiRequest::from_wire("GET /path HTTP/1.1\r\n\r\n");

        assert!(matches!(result, Err(ParseError::Request { .. })));
    }

    #[test]
    fn request_header_lookup_is_case_insensitive() {
        assert_eq!(request().header("authorization"), Some("Bearer token"));
        assert_eq!(request().header("X-Missing"), None);
    }

    #[test]
    fn response_wire_round_trip() {
        let original = ApiResponse::new(
            404,
            vec![(
                "X-Contentful-Request-Id".to_string(),
                "deadbeef".to_string(),
            )],
            "{\"sys\":{\"id\":\"NotFound\"}}",
        );
        let parsed = ApiResponse::from_wire(&original.to_wire()).unwrap();

        assert_eq!(parsed, original);
        assert_eq!(parsed.reason(), "Not Found");
    }

    #[test]
    fn response_without_body_round_trips() {
        let original = ApiResponse::new(204, Vec::new(), "");
        let parsed = ApiResponse::from_wire(&original.to_wire()).unwrap();

        assert_eq!(parsed, original);
        assert_eq!(parsed.body(), "");
    }

    #[test]
    fn response_invalid_status_line_fails() {
        assert!(matches!(
            ApiResponse::from_wire("HTTP/1.1 banana\r\n\r\n"),
            Err(ParseError::Response { .. })
        ));
    }

    #[test]
    fn query_serialization_uses_percent_twenty() {
        let encoded = serialize_query([("a", "b c"), ("d", "e")]);

        assert_eq!(encoded, "a=b%20c&d=e");
    }

    #[test]
    fn query_serialization_escapes_reserved_characters() {
        let encoded = serialize_query([("fields.slug[in]", "a,b")]);

        assert_eq!(encoded, "fields.slug%5Bin%5D=a%2Cb");
    }
}
