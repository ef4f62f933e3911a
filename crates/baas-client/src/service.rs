//! Service handle: configuration, session state and transport for one tenant.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::client::BaasHttpClient;
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::request::{build, PreparedRequest, RequestSpec};
use crate::response::Response;
use crate::session::SessionState;

/// Entry point for all REST calls against one tenant.
///
/// Cloning a `Service` is cheap; clones share the same session state and
/// transport settings, so a login or a [`set_default_timeout`](Self::set_default_timeout)
/// through one clone is seen by every resource wrapper holding another.
/// Token and expiry are always replaced together. Calls racing with a login
/// or logout from another task may observe either the old or the new token.
///
/// # Example
///
/// ```rust,ignore
/// use baas_client::{Service, ServiceConfig, RequestSpec};
///
/// let service = Service::new(ServiceConfig::new(
///     "https://api.example.com/api", "tenant1", "appId", "appKey",
/// ))?;
///
/// let result: serde_json::Value = service
///     .execute_json(RequestSpec::get("objects/bucket1").query("limit", 10))
///     .await?;
/// ```
#[derive(Clone)]
pub struct Service {
    transport: Arc<RwLock<Transport>>,
    session: Arc<RwLock<SessionState>>,
}

/// Configuration and the HTTP client built from it, swapped together.
struct Transport {
    config: Arc<ServiceConfig>,
    http: BaasHttpClient,
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("config", &self.config())
            .field("session", &*self.read_session())
            .finish_non_exhaustive()
    }
}

impl Service {
    /// Create a service. Fails if a mandatory configuration field is empty.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let config = config.validate()?;
        let http = BaasHttpClient::new(&config)?;
        Ok(Self {
            transport: Arc::new(RwLock::new(Transport {
                config: Arc::new(config),
                http,
            })),
            session: Arc::new(RwLock::new(SessionState::new())),
        })
    }

    /// Create a service from the default configuration file locations.
    pub fn from_default_config() -> Result<Self> {
        Self::new(ServiceConfig::load_default()?)
    }

    /// Create a service from `BAAS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ServiceConfig::from_env()?)
    }

    fn read_transport(&self) -> RwLockReadGuard<'_, Transport> {
        self.transport.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_transport(&self) -> RwLockWriteGuard<'_, Transport> {
        self.transport.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Arc<ServiceConfig> {
        Arc::clone(&self.read_transport().config)
    }

    pub fn base_url(&self) -> String {
        self.read_transport().config.base_url.clone()
    }

    pub fn tenant_id(&self) -> String {
        self.read_transport().config.tenant_id.clone()
    }

    /// Enable or disable server certificate verification.
    ///
    /// Rebuilds the HTTP client. Takes effect for every clone, including the
    /// ones held by resource wrappers; requests already in flight keep the
    /// old client.
    pub fn set_verify_server_cert(&self, verify: bool) -> Result<()> {
        let mut transport = self.write_transport();
        let mut config = (*transport.config).clone();
        config.verify_server_cert = verify;
        transport.http = BaasHttpClient::new(&config)?;
        transport.config = Arc::new(config);
        Ok(())
    }

    /// Set or remove the default timeout applied to every request.
    ///
    /// Takes effect for every clone, including the ones held by resource
    /// wrappers. A timeout set on a single request still wins.
    pub fn set_default_timeout(&self, timeout: Option<Duration>) {
        let mut transport = self.write_transport();
        let mut config = (*transport.config).clone();
        config.timeout = timeout;
        transport.config = Arc::new(config);
    }

    // =========================================================================
    // Session state
    // =========================================================================

    fn read_session(&self) -> RwLockReadGuard<'_, SessionState> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_session(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> SessionState {
        self.read_session().clone()
    }

    pub fn session_token(&self) -> Option<String> {
        self.read_session().token().map(str::to_string)
    }

    pub fn session_expiry(&self) -> Option<i64> {
        self.read_session().expiry()
    }

    /// Replace token and expiry.
    pub fn set_session(&self, token: impl Into<String>, expiry: i64) {
        self.write_session().set(token, expiry);
    }

    /// Replace the whole session state.
    pub fn replace_session(&self, session: SessionState) {
        *self.write_session() = session;
    }

    /// Drop token and expiry.
    pub fn clear_session(&self) {
        self.write_session().clear();
    }

    /// Fail with `NoSessionToken` or `SessionExpired` unless a live token is held.
    pub fn verify_session(&self) -> Result<()> {
        self.read_session().verify()
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Build the transport request for `spec` without sending it.
    pub fn prepare(&self, spec: RequestSpec) -> PreparedRequest {
        build(&self.read_transport().config, &self.read_session(), spec)
    }

    /// Send one REST call. Status >= 400 is returned as an error.
    #[instrument(skip(self, spec), fields(method = %spec.method(), path = %spec.path()))]
    pub async fn execute(&self, spec: RequestSpec) -> Result<Response> {
        let (request, http) = {
            let transport = self.read_transport();
            let request = build(&transport.config, &self.read_session(), spec);
            (request, transport.http.clone())
        };
        http.execute(request).await
    }

    /// Send one REST call and decode the JSON response.
    pub async fn execute_json<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        self.execute(spec).await?.json().await
    }
}
