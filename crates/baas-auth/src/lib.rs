//! # baas-auth
//!
//! Session management for the BaaS REST API.
//!
//! ## Security
//!
//! - Passwords and session tokens are redacted in Debug output
//! - Tracing skips credential parameters
//! - The session token file is created with mode 0600 on Unix
//!
//! ## Example
//!
//! ```rust,ignore
//! use baas_auth::{AuthClient, FileSessionStorage, SessionStorage};
//! use baas_client::Service;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), baas_auth::Error> {
//!     let service = Service::from_default_config()?;
//!     let auth = AuthClient::new(&service);
//!
//!     auth.login_with_username("foo", "Passw0rD").await?;
//!
//!     // Reuse the session in a later process
//!     let storage = FileSessionStorage::new()?;
//!     storage.save_from(&service)?;
//!
//!     auth.logout().await?;
//!     Ok(())
//! }
//! ```

mod error;
mod login;
mod storage;

pub use error::{Error, ErrorKind, Result};
pub use login::{AuthClient, LoginRequest, LoginResult, LOGIN_PATH};
pub use storage::{
    default_session_path, FileSessionStorage, SessionStorage, SESSION_TOKEN_FILE_NAME,
};
