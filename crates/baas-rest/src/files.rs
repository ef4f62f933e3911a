//! Binary file storage.

use baas_client::{RequestSpec, Response, Service, CONTENT_TYPE_OCTET_STREAM, HEADER_CONTENT_TYPE};
use bytes::Bytes;
use serde_json::Value;
use tracing::instrument;

use crate::common::{execute_results, execute_value, segment};
use crate::error::Result;

/// Header carrying the ACL of a new file.
pub const HEADER_ACL: &str = "X-ACL";

/// A file bucket.
#[derive(Debug, Clone)]
pub struct FileBucket {
    service: Service,
    bucket_name: String,
    path: String,
}

impl FileBucket {
    /// Fails if `bucket_name` is empty.
    pub fn new(service: &Service, bucket_name: &str) -> Result<Self> {
        let path = format!("files/{}", segment("bucket name", bucket_name)?);
        Ok(Self {
            service: service.clone(),
            bucket_name: bucket_name.to_string(),
            path,
        })
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    fn file_path(&self, filename: &str) -> Result<String> {
        Ok(format!("{}/{}", self.path, segment("file name", filename)?))
    }

    fn meta_path(&self, filename: &str) -> Result<String> {
        Ok(format!("{}/meta", self.file_path(filename)?))
    }

    /// List the metadata of all files in the bucket.
    #[instrument(skip(self), fields(bucket = %self.bucket_name))]
    pub async fn query(&self) -> Result<Vec<Value>> {
        let spec = RequestSpec::get(&self.path);
        Ok(execute_results(&self.service, spec).await?.results)
    }

    #[instrument(skip(self), fields(bucket = %self.bucket_name))]
    pub async fn get_metadata(&self, filename: &str) -> Result<Value> {
        let spec = RequestSpec::get(self.meta_path(filename)?);
        execute_value(&self.service, spec).await
    }

    /// Update file metadata, guarded by `meta_etag` when given.
    #[instrument(skip(self, meta), fields(bucket = %self.bucket_name))]
    pub async fn update_metadata(
        &self,
        filename: &str,
        meta: &Value,
        meta_etag: Option<&str>,
    ) -> Result<Value> {
        let mut spec = RequestSpec::put(self.meta_path(filename)?).json_value(meta.clone());
        if let Some(etag) = meta_etag {
            spec = spec.query("metaETag", etag);
        }
        execute_value(&self.service, spec).await
    }

    /// Upload a new file. Returns its metadata.
    ///
    /// `content_type` defaults to `application/octet-stream`.
    #[instrument(skip(self, data, acl), fields(bucket = %self.bucket_name))]
    pub async fn create(
        &self,
        filename: &str,
        data: impl Into<Bytes>,
        content_type: Option<&str>,
        acl: Option<&Value>,
    ) -> Result<Value> {
        let mut spec = upload(RequestSpec::post(self.file_path(filename)?), data, content_type);
        if let Some(acl) = acl {
            spec = spec.header(HEADER_ACL, serde_json::to_string(acl)?);
        }
        execute_value(&self.service, spec).await
    }

    /// Replace the content of an existing file. Returns its metadata.
    #[instrument(skip(self, data), fields(bucket = %self.bucket_name))]
    pub async fn update(
        &self,
        filename: &str,
        data: impl Into<Bytes>,
        content_type: Option<&str>,
        meta_etag: Option<&str>,
        file_etag: Option<&str>,
    ) -> Result<Value> {
        let mut spec = upload(RequestSpec::put(self.file_path(filename)?), data, content_type);
        if let Some(etag) = meta_etag {
            spec = spec.query("metaETag", etag);
        }
        if let Some(etag) = file_etag {
            spec = spec.query("fileETag", etag);
        }
        execute_value(&self.service, spec).await
    }

    /// Download a whole file.
    #[instrument(skip(self), fields(bucket = %self.bucket_name))]
    pub async fn download(&self, filename: &str) -> Result<Bytes> {
        let spec = RequestSpec::get(self.file_path(filename)?);
        Ok(self.service.execute(spec).await?.bytes().await?)
    }

    /// Download a file, reading the body on demand with [`Response::chunk`].
    #[instrument(skip(self), fields(bucket = %self.bucket_name))]
    pub async fn download_stream(&self, filename: &str) -> Result<Response> {
        let spec = RequestSpec::get(self.file_path(filename)?).stream(true);
        Ok(self.service.execute(spec).await?)
    }

    #[instrument(skip(self), fields(bucket = %self.bucket_name))]
    pub async fn remove(&self, filename: &str) -> Result<Value> {
        let spec = RequestSpec::delete(self.file_path(filename)?);
        execute_value(&self.service, spec).await
    }
}

fn upload(spec: RequestSpec, data: impl Into<Bytes>, content_type: Option<&str>) -> RequestSpec {
    spec.body(data)
        .header(HEADER_CONTENT_TYPE, content_type.unwrap_or(CONTENT_TYPE_OCTET_STREAM))
}
