//! # baas-rest
//!
//! Resource wrappers for the BaaS REST API.
//!
//! ## Features
//!
//! - **Objects** - JSON object CRUD, queries (with long-query fallback), batch, aggregation
//! - **Files** - Upload, download (buffered or streamed), metadata
//! - **Buckets** - Object and file bucket administration
//! - **Groups** - Access-control groups and their members
//! - **Users** - Registration, lookup, password reset
//! - **API gateway** - Calls to custom endpoints
//! - **Push** - Push notification dispatch
//!
//! Every wrapper holds a clone of a [`baas_client::Service`] and therefore
//! sends whatever session token that service currently holds.
//!
//! ## Example
//!
//! ```rust,ignore
//! use baas_client::{ObjectQuery, Service};
//! use baas_rest::ObjectBucket;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), baas_rest::Error> {
//!     let service = Service::from_default_config()?;
//!     let bucket = ObjectBucket::new(&service, "bucket1")?;
//!
//!     let created = bucket.insert(&json!({"product_name": "orange"})).await?;
//!     let id = created["_id"].as_str().unwrap_or_default();
//!
//!     let etag = created["etag"].as_str();
//!     bucket.update(id, &json!({"product_name": "apple"}), etag).await?;
//!
//!     let all: Vec<serde_json::Value> = bucket.query(&ObjectQuery::new()).await?;
//!     bucket.remove(id, false).await?;
//!
//!     Ok(())
//! }
//! ```

mod apigw;
mod buckets;
mod common;
mod error;
mod files;
mod groups;
mod objects;
mod push;
mod users;

pub use apigw::{ApiGateway, ApiRequest};
pub use buckets::{BucketType, Buckets};
pub use common::ResultList;
pub use error::{Error, ErrorKind, Result};
pub use files::{FileBucket, HEADER_ACL};
pub use groups::{Group, GroupMembers};
pub use objects::ObjectBucket;
pub use push::PushSender;
pub use users::{NewUser, Users};
