//! Bucket administration.

use std::fmt;
use std::str::FromStr;

use baas_client::{RequestSpec, Service};
use serde_json::{json, Value};
use tracing::instrument;

use crate::common::{execute_results, execute_value, segment};
use crate::error::{Error, Result};

/// Kind of bucket being administered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketType {
    Object,
    File,
}

impl BucketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketType::Object => "object",
            BucketType::File => "file",
        }
    }
}

impl fmt::Display for BucketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "object" => Ok(BucketType::Object),
            "file" => Ok(BucketType::File),
            other => Err(Error::invalid_input(format!("Bad bucket type: {}", other))),
        }
    }
}

/// Bucket administration for one bucket type.
///
/// Usually requires the master key as application key.
#[derive(Debug, Clone)]
pub struct Buckets {
    service: Service,
    bucket_type: BucketType,
}

impl Buckets {
    pub fn new(service: &Service, bucket_type: BucketType) -> Self {
        Self {
            service: service.clone(),
            bucket_type,
        }
    }

    pub fn bucket_type(&self) -> BucketType {
        self.bucket_type
    }

    fn base_path(&self) -> String {
        format!("buckets/{}", self.bucket_type)
    }

    fn bucket_path(&self, name: &str) -> Result<String> {
        Ok(format!("{}/{}", self.base_path(), segment("bucket name", name)?))
    }

    /// Create or update a bucket.
    #[instrument(skip(self, acl, content_acl), fields(bucket_type = %self.bucket_type))]
    pub async fn upsert(
        &self,
        name: &str,
        description: &str,
        acl: Option<&Value>,
        content_acl: Option<&Value>,
    ) -> Result<Value> {
        let mut body = json!({ "description": description });
        if let Some(acl) = acl {
            body["ACL"] = acl.clone();
        }
        if let Some(content_acl) = content_acl {
            body["contentACL"] = content_acl.clone();
        }
        let spec = RequestSpec::put(self.bucket_path(name)?).json_value(body);
        execute_value(&self.service, spec).await
    }

    /// List all buckets of this type.
    #[instrument(skip(self), fields(bucket_type = %self.bucket_type))]
    pub async fn query(&self) -> Result<Vec<Value>> {
        let spec = RequestSpec::get(self.base_path());
        Ok(execute_results(&self.service, spec).await?.results)
    }

    #[instrument(skip(self), fields(bucket_type = %self.bucket_type))]
    pub async fn get(&self, name: &str) -> Result<Value> {
        let spec = RequestSpec::get(self.bucket_path(name)?);
        execute_value(&self.service, spec).await
    }

    #[instrument(skip(self), fields(bucket_type = %self.bucket_type))]
    pub async fn remove(&self, name: &str) -> Result<Value> {
        let spec = RequestSpec::delete(self.bucket_path(name)?);
        execute_value(&self.service, spec).await
    }
}
