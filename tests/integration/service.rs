//! Request construction and error classification end to end.

use super::common::{config_for, init_tracing, service_for, tenant_path};
use baas_sdk::client::{ErrorKind, RequestSpec, Service, ServiceConfig};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_request_carries_application_headers_without_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(tenant_path("a/b/c")))
        .and(query_param("x", "1"))
        .and(header("X-Application-Id", "app1"))
        .and(header("X-Application-Key", "key1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let response = service
        .execute(RequestSpec::get("a/b/c").query("x", 1))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("X-Session-Token").is_none());
}

#[tokio::test]
async fn test_caller_cannot_override_application_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(tenant_path("objects/b1")))
        .and(header("X-Application-Key", "key1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    service
        .execute(RequestSpec::get("objects/b1").header("x-application-key", "forged"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_error_statuses_are_classified() {
    let mock_server = MockServer::start().await;

    let cases = [
        (400u16, "bad"),
        (401, "unauth"),
        (404, "missing"),
        (409, "conflict"),
        (500, "broken"),
        (418, "teapot"),
    ];
    for (status, name) in cases {
        Mock::given(method("GET"))
            .and(path(tenant_path(name)))
            .respond_with(
                ResponseTemplate::new(status).set_body_string(format!(r#"{{"error":"{}"}}"#, name)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let service = service_for(&mock_server);

    let err = service.execute(RequestSpec::get("bad")).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::BadRequest(_)));
    let err = service.execute(RequestSpec::get("unauth")).await.unwrap_err();
    assert!(err.is_unauthorized());
    let err = service.execute(RequestSpec::get("missing")).await.unwrap_err();
    assert!(err.is_not_found());
    let err = service.execute(RequestSpec::get("conflict")).await.unwrap_err();
    assert!(err.is_conflict());
    let err = service.execute(RequestSpec::get("broken")).await.unwrap_err();
    assert!(err.is_server_error());

    let err = service.execute(RequestSpec::get("teapot")).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Http(_)));
    let envelope = err.envelope().unwrap();
    assert_eq!(envelope.status, 418);
    assert_eq!(envelope.body, r#"{"error":"teapot"}"#);
    assert_eq!(envelope.message(), Some("teapot"));
}

#[tokio::test]
async fn test_per_request_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(tenant_path("slow")))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let err = service
        .execute(RequestSpec::get("slow").timeout(Duration::from_millis(100)))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Timeout));
}

#[tokio::test]
async fn test_service_from_saved_config_file() {
    init_tracing();
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yaml");

    config_for(&mock_server)
        .with_https_proxy("proxy.example.com:8443")
        .save(&config_path)
        .unwrap();

    let loaded = ServiceConfig::from_file(&config_path).unwrap();
    let proxy = loaded.proxy.as_ref().unwrap();
    assert_eq!(proxy.https.as_deref(), Some("proxy.example.com:8443"));
    assert!(proxy.http.is_none());

    let service = Service::new(loaded).unwrap();
    assert_eq!(service.tenant_id(), "tenant1");
    assert_eq!(service.base_url(), format!("{}/api", mock_server.uri()));
}

#[test]
fn test_missing_config_field_is_rejected() {
    let err = Service::new(ServiceConfig::new("http://localhost/api", "", "app1", "key1")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Config(_)));
}
