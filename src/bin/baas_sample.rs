//! Walk through the main resources against a live tenant.
//!
//! Reads the service configuration from `~/.baas/rust/config.yaml` (or
//! `/etc/baas/rust/config.yaml`) and logs in with `BAAS_USERNAME` /
//! `BAAS_PASSWORD`.
//!
//! ```sh
//! export BAAS_USERNAME=user1 BAAS_PASSWORD=Passw0rD
//! RUST_LOG=baas_client=debug cargo run --bin baas-sample
//! ```

use anyhow::Context;
use baas_sdk::auth::AuthClient;
use baas_sdk::client::{ObjectQuery, Service};
use baas_sdk::rest::{FileBucket, ObjectBucket};
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

const OBJECT_BUCKET: &str = "sample_objects";
const FILE_BUCKET: &str = "sample_files";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let username = std::env::var("BAAS_USERNAME").context("BAAS_USERNAME is not set")?;
    let password = std::env::var("BAAS_PASSWORD").context("BAAS_PASSWORD is not set")?;

    let service = Service::from_default_config().context("Failed to load service configuration")?;
    let auth = AuthClient::new(&service);

    let login = auth.login_with_username(&username, &password).await?;
    info!(expire = login.expire, "Logged in as {}", username);

    // Objects
    let bucket = ObjectBucket::new(&service, OBJECT_BUCKET)?;

    let mut obj = bucket.insert(&json!({"score": 90})).await?;
    println!("insert: {}", obj);

    let id = obj["_id"].as_str().unwrap_or_default().to_string();
    let etag = obj["etag"].as_str().map(str::to_string);
    obj["score"] = json!(95);
    let updated = bucket.update(&id, &obj, etag.as_deref()).await?;
    println!("update: {}", updated);

    let results: Vec<Value> = bucket
        .query(&ObjectQuery::new().filter(json!({"score": {"$gte": 90}})))
        .await?;
    println!("query: {} object(s)", results.len());

    let removed = bucket.remove_with_query(None, false).await?;
    println!("delete: {}", removed);

    // Files
    let files = FileBucket::new(&service, FILE_BUCKET)?;
    let acl = json!({"r": ["g:anonymous"], "w": ["g:anonymous"]});

    let meta = files
        .create("test.txt", "TESTDATA", Some("text/plain"), Some(&acl))
        .await?;
    println!("upload: {}", meta);

    let data = files.download("test.txt").await?;
    println!("download: {}", String::from_utf8_lossy(&data));

    files.remove("test.txt").await?;

    auth.logout().await?;
    info!("Logged out");

    Ok(())
}
