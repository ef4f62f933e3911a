use baas_sdk::client::{Service, ServiceConfig};
use wiremock::MockServer;

pub const TENANT: &str = "tenant1";
pub const APP_ID: &str = "app1";
pub const APP_KEY: &str = "key1";

/// Route logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Configuration pointing at `server`, with the usual `/api` base path.
pub fn config_for(server: &MockServer) -> ServiceConfig {
    ServiceConfig::new(format!("{}/api", server.uri()), TENANT, APP_ID, APP_KEY)
}

pub fn service_for(server: &MockServer) -> Service {
    init_tracing();
    Service::new(config_for(server)).expect("valid test configuration")
}

/// Path of `relative` under the tenant root on the mock server.
pub fn tenant_path(relative: &str) -> String {
    format!("/api/1/{}/{}", TENANT, relative)
}
