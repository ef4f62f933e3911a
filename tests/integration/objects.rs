//! Object storage end to end: optimistic concurrency and the long-query switch.

use super::common::{service_for, tenant_path};
use baas_sdk::client::{ObjectQuery, LONG_QUERY_THRESHOLD};
use baas_sdk::rest::ObjectBucket;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_update_with_stale_and_current_etag() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(tenant_path("objects/bucket1/oid1")))
        .and(query_param("etag", "stale"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"error": "etag mismatch"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path(tenant_path("objects/bucket1/oid1")))
        .and(query_param("etag", "e1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "oid1",
            "score": 95,
            "etag": "e2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let bucket = ObjectBucket::new(&service, "bucket1").unwrap();

    let err = bucket
        .update("oid1", &json!({"score": 95}), Some("stale"))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(err.status(), Some(409));

    let updated = bucket
        .update("oid1", &json!({"score": 95}), Some("e1"))
        .await
        .unwrap();
    assert_eq!(updated["etag"], "e2");
}

/// `where={"k":"..."}` URL-encodes to 28 characters plus the value length.
fn query_of_encoded_len(len: usize) -> ObjectQuery {
    ObjectQuery::new().filter(json!({"k": "a".repeat(len - 28)}))
}

#[tokio::test]
async fn test_long_query_boundary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(tenant_path("objects/bucket1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"via": "get"}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(tenant_path("objects/bucket1/_query")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"via": "post"}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let bucket = ObjectBucket::new(&service, "bucket1").unwrap();

    let short: Vec<Value> = bucket
        .query(&query_of_encoded_len(LONG_QUERY_THRESHOLD - 1))
        .await
        .unwrap();
    assert_eq!(short[0]["via"], "get");

    let long: Vec<Value> = bucket
        .query(&query_of_encoded_len(LONG_QUERY_THRESHOLD))
        .await
        .unwrap();
    assert_eq!(long[0]["via"], "post");

    let requests = mock_server.received_requests().await.unwrap();
    let post: Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(post["where"]["k"].as_str().unwrap().len(), LONG_QUERY_THRESHOLD - 28);
}

#[tokio::test]
async fn test_wrappers_share_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(tenant_path("objects/bucket1")))
        .and(wiremock::matchers::header("X-Session-Token", "TOK2"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "n1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let bucket = ObjectBucket::new(&service, "bucket1").unwrap();

    // Session set after the wrapper was built is still used.
    service.set_session("TOK2", i64::MAX);
    let created = bucket.insert(&json!({"a": 1})).await.unwrap();
    assert_eq!(created["_id"], "n1");
}
