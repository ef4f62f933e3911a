//! Login, logout and session persistence end to end.

use super::common::{service_for, tenant_path};
use baas_sdk::auth::{AuthClient, ErrorKind, FileSessionStorage, LoginRequest, SessionStorage};
use baas_sdk::client::RequestSpec;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(tenant_path("login")))
        .and(body_json(json!({"username": "foo", "password": "Passw0rD"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "user01",
            "username": "foo",
            "sessionToken": "TOK",
            "expire": 999
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_call_logout_cycle() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(tenant_path("users/current")))
        .and(header("X-Session-Token", "TOK"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "user01"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Only a request carrying the token logs out; anything else is 401.
    Mock::given(method("DELETE"))
        .and(path(tenant_path("login")))
        .and(header("X-Session-Token", "TOK"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(tenant_path("login")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let auth = AuthClient::new(&service);

    let result = auth.login_with_username("foo", "Passw0rD").await.unwrap();
    assert_eq!(result.session_token, "TOK");
    assert_eq!(service.session_token().as_deref(), Some("TOK"));
    assert_eq!(service.session_expiry(), Some(999));

    let me: serde_json::Value = service
        .execute_json(RequestSpec::get("users/current"))
        .await
        .unwrap();
    assert_eq!(me["_id"], "user01");

    auth.logout().await.unwrap();
    assert!(service.session_token().is_none());
    assert!(service.session_expiry().is_none());

    let err = auth.logout().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_login_requires_password_and_identity() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(tenant_path("login")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let auth = AuthClient::new(&service_for(&mock_server));

    let no_password = LoginRequest {
        username: Some("foo".to_string()),
        ..Default::default()
    };
    let err = auth.login(&no_password).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidInput(_)));

    let no_identity = LoginRequest {
        password: Some("Passw0rD".to_string()),
        ..Default::default()
    };
    let err = auth.login(&no_identity).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidInput(_)));
}

#[tokio::test]
async fn test_session_file_round_trip() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let storage = FileSessionStorage::with_path(temp_dir.path().join("session_token.json"));

    let first = service_for(&mock_server);
    AuthClient::new(&first)
        .login_with_username("foo", "Passw0rD")
        .await
        .unwrap();
    storage.save_from(&first).unwrap();

    let second = service_for(&mock_server);
    assert!(second.session_token().is_none());
    storage.restore(&second).unwrap();

    assert_eq!(second.session_token().as_deref(), Some("TOK"));
    assert_eq!(second.session_expiry(), Some(999));

    storage.delete().unwrap();
    storage.restore(&second).unwrap();
    assert!(second.session_token().is_none());
}
