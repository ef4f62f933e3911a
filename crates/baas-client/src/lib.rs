//! # baas-client
//!
//! Core HTTP client infrastructure for the BaaS REST API.
//!
//! This crate provides:
//! - Service configuration (YAML file, environment, builder)
//! - Session state shared between all users of a [`Service`]
//! - Request construction (tenant-scoped URL, application and session headers)
//! - Transport with error classification by HTTP status
//! - Object query encoding with the long-query fallback
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (baas-auth, baas-rest)                                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Service                              │
//! │  - Holds configuration + session state + HTTP client        │
//! │  - Builds requests from RequestSpec (headers, URL, timeout) │
//! │  - Typed JSON helper (execute_json)                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    BaasHttpClient                           │
//! │  - Raw HTTP with proxies, compression, TLS settings         │
//! │  - Status >= 400 classified into ErrorKind                  │
//! │  - Buffered or streamed responses                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use baas_client::{ObjectQuery, RequestSpec, Service};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), baas_client::Error> {
//!     let service = Service::from_default_config()?;
//!
//!     let spec = ObjectQuery::new()
//!         .filter(json!({"product_name": "orange"}))
//!         .limit(10)
//!         .to_request("objects/bucket1")?;
//!     let result: serde_json::Value = service.execute_json(spec).await?;
//!
//!     let created: serde_json::Value = service
//!         .execute_json(RequestSpec::post("objects/bucket1").json(&json!({"a": 1}))?)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod query;
mod request;
mod response;
mod service;
mod session;

pub use client::BaasHttpClient;
pub use config::{default_config_paths, ProxyConfig, ServiceConfig};
pub use error::{classify, Error, ErrorEnvelope, ErrorKind, Result};
pub use query::{
    encode_query, encoded_len, EncodedQuery, ObjectQuery, QueryPlan, LONG_QUERY_SUFFIX,
    LONG_QUERY_THRESHOLD,
};
pub use request::{
    build, tenant_url, PreparedRequest, RequestBody, RequestMethod, RequestSpec,
    API_VERSION_SEGMENT, CONTENT_TYPE_JSON, CONTENT_TYPE_OCTET_STREAM, HEADER_APP_ID,
    HEADER_APP_KEY, HEADER_CONTENT_TYPE, HEADER_SESSION_TOKEN,
};
pub use response::Response;
pub use service::Service;
pub use session::SessionState;

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("baas-sdk/", env!("CARGO_PKG_VERSION"));
