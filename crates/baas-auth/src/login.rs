//! Login and logout against the `/login` endpoint.

use baas_client::{RequestSpec, Service};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::error::{Error, ErrorKind, Result};

/// Path of the login endpoint.
pub const LOGIN_PATH: &str = "login";

/// Credentials sent to `POST /login`.
///
/// A password and one of username or email are required.
#[derive(Clone, Default, Serialize)]
pub struct LoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl LoginRequest {
    pub fn with_username(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Default::default()
        }
    }

    pub fn with_email(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
            ..Default::default()
        }
    }

    /// Reject requests the server would refuse anyway.
    pub fn validate(&self) -> Result<()> {
        if self.password.as_deref().map_or(true, str::is_empty) {
            return Err(Error::new(ErrorKind::InvalidInput(
                "password is required".to_string(),
            )));
        }
        let has_username = self.username.as_deref().is_some_and(|s| !s.is_empty());
        let has_email = self.email.as_deref().is_some_and(|s| !s.is_empty());
        if !has_username && !has_email {
            return Err(Error::new(ErrorKind::InvalidInput(
                "username or email is required".to_string(),
            )));
        }
        Ok(())
    }
}

/// Successful login response.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub session_token: String,
    /// Token expiry, unix epoch seconds.
    pub expire: i64,
    /// Remaining user fields (`_id`, `username`, `email`, ...).
    #[serde(flatten)]
    pub user: Map<String, Value>,
}

impl std::fmt::Debug for LoginResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResult")
            .field("session_token", &"[REDACTED]")
            .field("expire", &self.expire)
            .field("user", &self.user)
            .finish()
    }
}

/// Login / logout for a [`Service`].
///
/// The session token obtained by [`login`](Self::login) is stored in the
/// service, so every clone of it (and every resource wrapper built on one)
/// sends it from then on.
#[derive(Debug, Clone)]
pub struct AuthClient {
    service: Service,
}

impl AuthClient {
    pub fn new(service: &Service) -> Self {
        Self {
            service: service.clone(),
        }
    }

    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Log in with user name and password.
    pub async fn login_with_username(&self, username: &str, password: &str) -> Result<LoginResult> {
        self.login(&LoginRequest::with_username(username, password))
            .await
    }

    /// Log in with e-mail address and password.
    pub async fn login_with_email(&self, email: &str, password: &str) -> Result<LoginResult> {
        self.login(&LoginRequest::with_email(email, password)).await
    }

    /// Log in and store the session token and its expiry.
    ///
    /// The request is checked locally first: without a password, or without
    /// a username or e-mail, this fails with `InvalidInput` and nothing is
    /// sent. Wrong credentials are rejected by the server with 401.
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResult> {
        request.validate()?;

        let spec = RequestSpec::post(LOGIN_PATH).json(request)?;
        let result: LoginResult = self.service.execute_json(spec).await?;

        self.service
            .set_session(result.session_token.clone(), result.expire);
        info!(expire = result.expire, "Logged in");

        Ok(result)
    }

    /// Log out and clear the session.
    ///
    /// Logging out without a valid session fails with 401.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<Value> {
        let response = self.service.execute(RequestSpec::delete(LOGIN_PATH)).await?;
        let body = response.bytes().await.map_err(Error::from)?;

        self.service.clear_session();
        info!("Logged out");

        if body.is_empty() {
            Ok(Value::Null)
        } else {
            Ok(serde_json::from_slice(&body)?)
        }
    }

    /// Check that a session token is held and has not expired.
    pub fn verify(&self) -> Result<()> {
        self.service.verify_session().map_err(Into::into)
    }

    /// Returns true if a session token is held.
    pub fn is_logged_in(&self) -> bool {
        self.service.session_token().is_some()
    }
}
