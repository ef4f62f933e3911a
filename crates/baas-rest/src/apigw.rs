//! Custom API gateway endpoints.

use std::collections::HashMap;

use baas_client::{RequestMethod, RequestSpec, Response, Service};
use bytes::Bytes;
use serde_json::Value;
use tracing::instrument;

use crate::common::segment;
use crate::error::Result;

/// Optional parts of an API gateway call.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    query: Vec<(String, String)>,
    json: Option<Value>,
    body: Option<Bytes>,
    headers: HashMap<String, String>,
}

impl ApiRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Raw body. Sent instead of any JSON body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    fn apply(self, mut spec: RequestSpec) -> RequestSpec {
        spec = spec.query_pairs(self.query).headers(&self.headers);
        if let Some(json) = self.json {
            spec = spec.json_value(json);
        }
        if let Some(body) = self.body {
            spec = spec.body(body);
        }
        spec
    }
}

/// One custom API endpoint: `{method} api/{apiname}/{subpath}`.
///
/// # Example
///
/// ```rust,ignore
/// let api = ApiGateway::new(&service, "sensor", "POST", Some("temperature"))?;
/// let response = api.execute(ApiRequest::new().json(json!({"temperature": 26.3}))).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiGateway {
    service: Service,
    method: RequestMethod,
    path: String,
}

impl ApiGateway {
    /// Fails on an empty API name or a method other than GET/POST/PUT/DELETE.
    ///
    /// A leading slash on `subpath` is ignored.
    pub fn new(service: &Service, apiname: &str, method: &str, subpath: Option<&str>) -> Result<Self> {
        let method: RequestMethod = method.parse()?;
        let mut path = format!("api/{}", segment("API name", apiname)?);
        if let Some(subpath) = subpath {
            let subpath = subpath.strip_prefix('/').unwrap_or(subpath);
            if !subpath.is_empty() {
                path.push('/');
                path.push_str(subpath);
            }
        }
        Ok(Self {
            service: service.clone(),
            method,
            path,
        })
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    /// Path relative to the tenant root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Call the endpoint and return the raw response.
    #[instrument(skip(self, request), fields(method = %self.method, path = %self.path))]
    pub async fn execute(&self, request: ApiRequest) -> Result<Response> {
        let spec = request.apply(RequestSpec::new(self.method, self.path.as_str()));
        Ok(self.service.execute(spec).await?)
    }
}
