//! User administration.
//!
//! Login and logout live in `baas-auth`.

use baas_client::{RequestSpec, Service};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::instrument;

use crate::common::{execute_results, execute_value, segment};
use crate::error::Result;

/// Registration data for a new user.
#[derive(Clone, Default, Serialize)]
pub struct NewUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("options", &self.options)
            .finish()
    }
}

impl NewUser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }
}

/// User administration endpoints.
#[derive(Debug, Clone)]
pub struct Users {
    service: Service,
}

impl Users {
    pub fn new(service: &Service) -> Self {
        Self {
            service: service.clone(),
        }
    }

    fn user_path(user_id: &str) -> Result<String> {
        Ok(format!("users/{}", segment("user id", user_id)?))
    }

    /// Register a user. Returns the created user.
    #[instrument(skip(self, user))]
    pub async fn register(&self, user: &NewUser) -> Result<Value> {
        let spec = RequestSpec::post("users").json(user)?;
        execute_value(&self.service, spec).await
    }

    /// Update a user, guarded by `etag` when given.
    #[instrument(skip(self, update))]
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        user_id: &str,
        update: &T,
        etag: Option<&str>,
    ) -> Result<Value> {
        let mut spec = RequestSpec::put(Self::user_path(user_id)?).json(update)?;
        if let Some(etag) = etag {
            spec = spec.query("etag", etag);
        }
        execute_value(&self.service, spec).await
    }

    /// Find users by user name and/or e-mail. No filter lists all users.
    #[instrument(skip(self))]
    pub async fn query(&self, username: Option<&str>, email: Option<&str>) -> Result<Vec<Value>> {
        let mut spec = RequestSpec::get("users");
        if let Some(username) = username {
            spec = spec.query("username", username);
        }
        if let Some(email) = email {
            spec = spec.query("email", email);
        }
        Ok(execute_results(&self.service, spec).await?.results)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: &str) -> Result<Value> {
        execute_value(&self.service, RequestSpec::get(Self::user_path(user_id)?)).await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: &str) -> Result<Value> {
        execute_value(&self.service, RequestSpec::delete(Self::user_path(user_id)?)).await
    }

    /// Ask the server to mail a password reset link.
    #[instrument(skip(self))]
    pub async fn reset_password_with_username(&self, username: &str) -> Result<Value> {
        self.request_password_reset(json!({ "username": username }))
            .await
    }

    /// Ask the server to mail a password reset link.
    #[instrument(skip(self))]
    pub async fn reset_password_with_email(&self, email: &str) -> Result<Value> {
        self.request_password_reset(json!({ "email": email })).await
    }

    async fn request_password_reset(&self, body: Value) -> Result<Value> {
        let spec = RequestSpec::post("request_password_reset").json_value(body);
        execute_value(&self.service, spec).await
    }
}
