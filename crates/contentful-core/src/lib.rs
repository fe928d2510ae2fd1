//! contentful-core - Foundation layer for Contentful API SDKs.
//!
//! This library provides what the delivery and management SDKs have in
//! common: a request/response pipeline with typed error classification,
//! an extensible resource-mapping facility, and the small value types of
//! the Contentful data model (links, locations, files, queries).
//!
//! # Example
//!
//! ```no_run
//! use contentful_core::{Api, BaseClient, ClientConfig, Method, RequestOptions};
//!
//! # async fn example() -> Result<(), contentful_core::Error> {
//! let config = ClientConfig::new(
//!     Api::Delivery,
//!     "access-token",
//!     "https://cdn.contentful.com",
//!     "application/vnd.contentful.delivery.v1+json",
//!     "contentful.rs",
//! )
//! .sdk_version(env!("CARGO_PKG_VERSION"));
//!
//! let client = BaseClient::new(config)?;
//! let space = client
//!     .call_api(Method::GET, "/spaces/cfexampleapi", RequestOptions::new())
//!     .await?;
//!
//! println!("{:?}", space.get("name"));
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod file;
pub mod resource;
pub mod resource_builder;
pub mod transport;

// Re-export primary types at crate root for convenience
pub use api::{
    Api, ApiRequest, ApiResponse, Application, BaseClient, ClientConfig, ErrorRegistry,
    FALLBACK_SDK_VERSION, Integration, Link, LinkResolver, Location, Message, MimeTypeGroup,
    Operator, Query, QueryValue, RequestBuilder, RequestOptions, Requester, UserAgentGenerator,
};
pub use error::{ApiError, BuilderError, Error, ErrorKind, ParseError, TransportError};
pub use file::{File, ImageFile, ImageOptions, LocalUploadFile, RemoteUploadFile};
pub use resource::{ArraySystemProperties, Resource, ResourceArray, ResourcePool, SystemProperties};
pub use resource_builder::{Mapper, ResourceBuilder};
pub use transport::{HttpTransport, ReqwestTransport};

/// The HTTP method type used throughout the pipeline.
pub use reqwest::Method;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// A raw decoded JSON payload, as produced by decoding an API response.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;
