//! File storage end to end.

use super::common::{service_for, tenant_path};
use baas_sdk::rest::FileBucket;
use serde_json::json;
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_upload_download_remove() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(tenant_path("files/test1/test.txt")))
        .and(header("Content-Type", "text/plain"))
        .and(header("X-ACL", r#"{"r":["g:anonymous"]}"#))
        .and(body_bytes(b"TESTDATA".to_vec()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "filename": "test.txt",
            "metaETag": "m1",
            "fileETag": "f1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(tenant_path("files/test1/test.txt")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"TESTDATA".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(tenant_path("files/test1/test.txt")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let bucket = FileBucket::new(&service, "test1").unwrap();

    let meta = bucket
        .create(
            "test.txt",
            "TESTDATA",
            Some("text/plain"),
            Some(&json!({"r": ["g:anonymous"]})),
        )
        .await
        .unwrap();
    assert_eq!(meta["fileETag"], "f1");

    let data = bucket.download("test.txt").await.unwrap();
    assert_eq!(&data[..], b"TESTDATA");

    bucket.remove("test.txt").await.unwrap();
}

#[tokio::test]
async fn test_file_names_are_escaped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(tenant_path("files/test1/my%20file.txt/meta")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"filename": "my file.txt"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let bucket = FileBucket::new(&service, "test1").unwrap();

    let meta = bucket.get_metadata("my file.txt").await.unwrap();
    assert_eq!(meta["filename"], "my file.txt");
}
