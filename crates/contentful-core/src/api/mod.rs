//! API plumbing: requests, responses, messages, and the client itself.

pub mod client;
pub mod date;
pub mod http;
pub mod link;
pub mod location;
pub mod message;
pub mod query;
pub mod request_builder;
pub mod requester;
pub mod user_agent;

pub use client::{Application, BaseClient, ClientConfig, FALLBACK_SDK_VERSION, Integration};
pub use http::{ApiRequest, ApiResponse};
pub use link::{Link, LinkResolver};
pub use location::Location;
pub use message::{Api, Message};
pub use query::{MimeTypeGroup, Operator, Query, QueryValue};
pub use request_builder::{RequestBuilder, RequestOptions};
pub use requester::{ErrorRegistry, Requester};
pub use user_agent::UserAgentGenerator;
