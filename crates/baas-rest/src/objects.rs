//! JSON object storage.

use baas_client::{ObjectQuery, RequestSpec, Service};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::instrument;

use crate::common::{execute_results, execute_value, flag, segment};
use crate::error::{Error, ErrorKind, Result};

/// An object bucket.
///
/// # Example
///
/// ```rust,ignore
/// use baas_rest::ObjectBucket;
/// use baas_client::ObjectQuery;
///
/// let bucket = ObjectBucket::new(&service, "bucket1")?;
/// let created = bucket.insert(&json!({"product_name": "orange"})).await?;
///
/// let oranges: Vec<serde_json::Value> = bucket
///     .query(&ObjectQuery::new().filter(json!({"product_name": "orange"})))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ObjectBucket {
    service: Service,
    bucket_name: String,
    path: String,
}

impl ObjectBucket {
    /// Fails if `bucket_name` is empty.
    pub fn new(service: &Service, bucket_name: &str) -> Result<Self> {
        let path = format!("objects/{}", segment("bucket name", bucket_name)?);
        Ok(Self {
            service: service.clone(),
            bucket_name: bucket_name.to_string(),
            path,
        })
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    fn object_path(&self, oid: &str) -> Result<String> {
        Ok(format!("{}/{}", self.path, segment("object id", oid)?))
    }

    /// Query objects.
    ///
    /// Long queries are sent as `POST .../_query` with a JSON body.
    #[instrument(skip(self, query), fields(bucket = %self.bucket_name))]
    pub async fn query<T: DeserializeOwned>(&self, query: &ObjectQuery) -> Result<Vec<T>> {
        let spec = query.to_request(&self.path)?;
        Ok(execute_results(&self.service, spec).await?.results)
    }

    /// Query objects and the total number of matches.
    #[instrument(skip(self, query), fields(bucket = %self.bucket_name))]
    pub async fn query_with_count<T: DeserializeOwned>(
        &self,
        query: &ObjectQuery,
    ) -> Result<(Vec<T>, i64)> {
        let spec = query.clone().count(true).to_request(&self.path)?;
        let list = execute_results(&self.service, spec).await?;
        let count = list.count.ok_or_else(|| {
            Error::new(ErrorKind::UnexpectedResponse("No count in response".to_string()))
        })?;
        Ok((list.results, count))
    }

    /// Insert an object. Returns the created object.
    #[instrument(skip(self, data), fields(bucket = %self.bucket_name))]
    pub async fn insert<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        let spec = RequestSpec::post(&self.path).json(data)?;
        execute_value(&self.service, spec).await
    }

    /// Full update of an object.
    ///
    /// With `etag`, the server rejects the update with 409 if the object
    /// changed since that ETag was read.
    #[instrument(skip(self, data), fields(bucket = %self.bucket_name))]
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        oid: &str,
        data: &T,
        etag: Option<&str>,
    ) -> Result<Value> {
        let mut spec = RequestSpec::put(self.object_path(oid)?).json(data)?;
        if let Some(etag) = etag {
            spec = spec.query("etag", etag);
        }
        execute_value(&self.service, spec).await
    }

    /// Remove one object. With `soft_delete` it is only marked deleted.
    #[instrument(skip(self), fields(bucket = %self.bucket_name))]
    pub async fn remove(&self, oid: &str, soft_delete: bool) -> Result<Value> {
        let spec = RequestSpec::delete(self.object_path(oid)?).query("deleteMark", flag(soft_delete));
        execute_value(&self.service, spec).await
    }

    /// Remove all objects matching `filter` (all objects when `None`).
    #[instrument(skip(self, filter), fields(bucket = %self.bucket_name))]
    pub async fn remove_with_query(&self, filter: Option<&Value>, soft_delete: bool) -> Result<Value> {
        let filter = match filter {
            Some(filter) => serde_json::to_string(filter)?,
            None => "{}".to_string(),
        };
        let spec = RequestSpec::delete(&self.path)
            .query("where", filter)
            .query("deleteMark", flag(soft_delete));
        execute_value(&self.service, spec).await
    }

    /// Run several operations in one call. Returns one result per request.
    ///
    /// Each request is an object such as `{"op": "insert", "data": {...}}`.
    #[instrument(skip(self, requests), fields(bucket = %self.bucket_name, count = requests.len()))]
    pub async fn batch(&self, requests: &[Value], soft_delete: bool) -> Result<Vec<Value>> {
        let spec = RequestSpec::post(format!("{}/_batch", self.path))
            .query("deleteMark", flag(soft_delete))
            .json_value(json!({ "requests": requests }));
        Ok(execute_results(&self.service, spec).await?.results)
    }

    /// Run an aggregation pipeline.
    #[instrument(skip(self, pipeline, options), fields(bucket = %self.bucket_name))]
    pub async fn aggregate<T: DeserializeOwned>(
        &self,
        pipeline: &[Value],
        options: Option<&Value>,
    ) -> Result<Vec<T>> {
        let mut body = json!({ "pipeline": pipeline });
        if let Some(options) = options {
            body["options"] = options.clone();
        }
        let spec = RequestSpec::post(format!("{}/_aggregate", self.path)).json_value(body);
        Ok(execute_results(&self.service, spec).await?.results)
    }
}
