//! Service configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// Connection parameters for one tenant of a BaaS server.
///
/// The base URL is normalised on [`validate`](Self::validate): a single
/// trailing slash is stripped. The app key may be a master key when the
/// caller needs administrative endpoints (buckets, users, groups).
///
/// ```yaml
/// baseUrl: https://api.example.com/api
/// tenantId: tenant1
/// appId: 0123456789abcdef
/// appKey: 0123456789abcdef
/// proxy:
///   http: proxy.example.com:8080
///   https: proxy.example.com:8080
/// timeoutMs: 1500
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Base URL of the API server, e.g. `https://api.example.com/api`.
    #[serde(default)]
    pub base_url: String,
    /// Tenant ID or tenant name.
    #[serde(default)]
    pub tenant_id: String,
    /// Application ID.
    #[serde(default)]
    pub app_id: String,
    /// Application key or master key.
    #[serde(default)]
    pub app_key: String,
    /// Per-scheme proxy settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
    /// Verify the server certificate (default: true).
    #[serde(default = "default_verify", skip_serializing_if = "is_true")]
    pub verify_server_cert: bool,
    /// Default timeout applied to every request. Written as `timeoutMs`.
    #[serde(
        default,
        rename = "timeoutMs",
        with = "timeout_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

/// `Option<Duration>` as whole milliseconds, rounding sub-millisecond parts up.
mod timeout_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        value
            .map(|d| u64::try_from(d.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX))
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

fn default_verify() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url)
            .field("tenant_id", &self.tenant_id)
            .field("app_id", &self.app_id)
            .field("app_key", &"[REDACTED]")
            .field("proxy", &self.proxy)
            .field("verify_server_cert", &self.verify_server_cert)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Proxy settings, one `host:port` per scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy for `http://` URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<String>,
    /// Proxy for `https://` URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https: Option<String>,
}

impl ProxyConfig {
    /// Returns true if no proxy is declared.
    pub fn is_empty(&self) -> bool {
        self.http.is_none() && self.https.is_none()
    }
}

/// Turn a `host:port` proxy entry into a URL reqwest accepts.
pub(crate) fn proxy_url(entry: &str) -> String {
    if entry.contains("://") {
        entry.to_string()
    } else {
        format!("http://{}", entry)
    }
}

impl ServiceConfig {
    /// Create a configuration from the four mandatory parameters.
    pub fn new(
        base_url: impl Into<String>,
        tenant_id: impl Into<String>,
        app_id: impl Into<String>,
        app_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            tenant_id: tenant_id.into(),
            app_id: app_id.into(),
            app_key: app_key.into(),
            proxy: None,
            verify_server_cert: true,
            timeout: None,
        }
    }

    /// Set both proxies.
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Set the proxy for `http://` URLs.
    pub fn with_http_proxy(mut self, host_port: impl Into<String>) -> Self {
        self.proxy.get_or_insert_with(ProxyConfig::default).http = Some(host_port.into());
        self
    }

    /// Set the proxy for `https://` URLs.
    pub fn with_https_proxy(mut self, host_port: impl Into<String>) -> Self {
        self.proxy.get_or_insert_with(ProxyConfig::default).https = Some(host_port.into());
        self
    }

    /// Enable or disable server certificate verification.
    pub fn with_verify_server_cert(mut self, verify: bool) -> Self {
        self.verify_server_cert = verify;
        self
    }

    /// Set the default request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Default request timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Check mandatory fields and normalise the base URL.
    pub fn validate(mut self) -> Result<Self> {
        let required = [
            ("baseUrl", &self.base_url),
            ("tenantId", &self.tenant_id),
            ("appId", &self.app_id),
            ("appKey", &self.app_key),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(Error::new(ErrorKind::Config(format!("No {}", name))));
            }
        }

        if let Some(stripped) = self.base_url.strip_suffix('/') {
            self.base_url = stripped.to_string();
        }
        if self.proxy.as_ref().is_some_and(ProxyConfig::is_empty) {
            self.proxy = None;
        }

        Ok(self)
    }

    /// Parse a YAML configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&yaml)
    }

    /// Load configuration from the first readable default location.
    ///
    /// Searched in order: `~/.baas/rust/config.yaml`, `/etc/baas/rust/config.yaml`.
    pub fn load_default() -> Result<Self> {
        for path in default_config_paths() {
            match std::fs::read_to_string(&path) {
                Ok(yaml) => {
                    tracing::debug!(path = %path.display(), "Loading service configuration");
                    return Self::from_yaml_str(&yaml);
                }
                Err(_) => continue,
            }
        }
        Err(Error::new(ErrorKind::Config(
            "No service parameters".to_string(),
        )))
    }

    /// Load configuration from environment variables.
    ///
    /// Required: `BAAS_BASE_URL`, `BAAS_TENANT_ID`, `BAAS_APP_ID`, `BAAS_APP_KEY`.
    /// Optional: `BAAS_HTTP_PROXY`, `BAAS_HTTPS_PROXY`.
    pub fn from_env() -> Result<Self> {
        fn var(name: &str) -> Result<String> {
            std::env::var(name).map_err(|_| {
                Error::new(ErrorKind::Config(format!(
                    "Environment variable not set: {}",
                    name
                )))
            })
        }

        let mut config = Self::new(
            var("BAAS_BASE_URL")?,
            var("BAAS_TENANT_ID")?,
            var("BAAS_APP_ID")?,
            var("BAAS_APP_KEY")?,
        );
        if let Ok(http) = std::env::var("BAAS_HTTP_PROXY") {
            config = config.with_http_proxy(http);
        }
        if let Ok(https) = std::env::var("BAAS_HTTPS_PROXY") {
            config = config.with_https_proxy(https);
        }
        config.validate()
    }

    /// Save configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path.as_ref(), yaml)?;
        Ok(())
    }
}

/// Default configuration file locations, most specific first.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".baas").join("rust").join("config.yaml"));
    }
    paths.push(PathBuf::from("/etc/baas/rust/config.yaml"));
    paths
}
