//! # baas-sdk
//!
//! Client library for the BaaS REST API.
//!
//! Every operation maps one method call to one HTTP request against the
//! tenant-scoped REST API (`{baseUrl}/1/{tenantId}/...`), authenticated by the
//! application id/key and, after login, a session token.
//!
//! ## Security
//!
//! - The application key, passwords and session tokens are redacted in Debug output
//! - Tracing skips credential parameters
//! - The session token file is created with mode 0600 on Unix
//!
//! ## Crates
//!
//! - **baas-client** - Configuration, session state, request building, transport, error classification, query encoding
//! - **baas-auth** - Login, logout, session token persistence
//! - **baas-rest** - Objects, files, buckets, groups, users, API gateway, push
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use baas_sdk::{AuthClient, ObjectBucket, ObjectQuery, Service};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads ~/.baas/rust/config.yaml or /etc/baas/rust/config.yaml
//!     let service = Service::from_default_config()?;
//!
//!     AuthClient::new(&service)
//!         .login_with_username("foo", "Passw0rD")
//!         .await?;
//!
//!     let bucket = ObjectBucket::new(&service, "bucket1")?;
//!     bucket.insert(&json!({"product_name": "orange"})).await?;
//!
//!     let oranges: Vec<serde_json::Value> = bucket
//!         .query(&ObjectQuery::new().filter(json!({"product_name": "orange"})))
//!         .await?;
//!
//!     for orange in oranges {
//!         println!("{}", orange["_id"]);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "auth")]
pub use baas_auth as auth;
#[cfg(feature = "client")]
pub use baas_client as client;
#[cfg(feature = "rest")]
pub use baas_rest as rest;

// Re-export commonly used types at the top level
#[cfg(feature = "auth")]
pub use baas_auth::{AuthClient, FileSessionStorage, SessionStorage};
#[cfg(feature = "client")]
pub use baas_client::{ObjectQuery, RequestSpec, Service, ServiceConfig};
#[cfg(feature = "rest")]
pub use baas_rest::{FileBucket, ObjectBucket};
