//! Request construction: tenant-scoped URLs, application headers and bodies.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;

use crate::config::ServiceConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::session::SessionState;

/// Protocol version segment placed between the base URL and the tenant.
pub const API_VERSION_SEGMENT: &str = "1";

pub const HEADER_APP_ID: &str = "X-Application-Id";
pub const HEADER_APP_KEY: &str = "X-Application-Key";
pub const HEADER_SESSION_TOKEN: &str = "X-Session-Token";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }

    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMethod {
    type Err = Error;

    /// Case-insensitive. Anything but GET/POST/PUT/DELETE is rejected.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(RequestMethod::Get),
            "POST" => Ok(RequestMethod::Post),
            "PUT" => Ok(RequestMethod::Put),
            "DELETE" => Ok(RequestMethod::Delete),
            other => Err(Error::new(ErrorKind::UnsupportedMethod(other.to_string()))),
        }
    }
}

/// Request body content.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document; sent with `application/json` unless the caller set a type.
    Json(serde_json::Value),
    /// Raw bytes.
    Bytes(Bytes),
}

/// Everything a caller can say about one REST call.
///
/// `path` is relative to the tenant root (`/1/{tenantId}/`). When both a
/// raw body and a JSON body are given, the raw body is sent and the JSON is
/// ignored.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub(crate) method: RequestMethod,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) json: Option<serde_json::Value>,
    pub(crate) body: Option<Bytes>,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) stream: bool,
    pub(crate) timeout: Option<Duration>,
}

impl RequestSpec {
    /// Create a new request spec.
    pub fn new(method: RequestMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            json: None,
            body: None,
            headers: HashMap::new(),
            stream: false,
            timeout: None,
        }
    }

    /// Create a request spec from a method name such as `"get"` or `"POST"`.
    pub fn parse(method: &str, path: impl Into<String>) -> Result<Self> {
        Ok(Self::new(method.parse()?, path))
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Delete, path)
    }

    /// Add a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Add several query parameters.
    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    /// Set a JSON body, serializing it now.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.json = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Set a JSON body from a value.
    pub fn json_value(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Set a raw body. Takes precedence over any JSON body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add several headers.
    pub fn headers(mut self, headers: &HashMap<String, String>) -> Self {
        self.headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Do not buffer the response body eagerly.
    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Override the default timeout for this call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A request ready for the transport.
///
/// Proxy and certificate-verification settings belong to the transport the
/// request is executed on, which is built from the same [`ServiceConfig`].
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub(crate) method: RequestMethod,
    pub(crate) url: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Option<RequestBody>,
    pub(crate) stream: bool,
    pub(crate) timeout: Option<Duration>,
}

impl PreparedRequest {
    pub fn method(&self) -> RequestMethod {
        self.method
    }

    /// Fully-qualified URL without the query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query parameters, unencoded.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// First query value with the given name.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Explicit headers. The JSON content type is not among them; see
    /// [`content_type`](Self::content_type).
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name).map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub fn is_stream(&self) -> bool {
        self.stream
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Content type the request goes out with.
    pub fn content_type(&self) -> Option<&str> {
        self.header(HEADER_CONTENT_TYPE).or(match self.body {
            Some(RequestBody::Json(_)) => Some(CONTENT_TYPE_JSON),
            _ => None,
        })
    }
}

fn find_header<'a>(
    headers: &'a HashMap<String, String>,
    name: &str,
) -> Option<(&'a String, &'a String)> {
    headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name))
}

/// Insert a header, replacing any existing entry of the same name in any case.
fn force_header(headers: &mut HashMap<String, String>, name: &str, value: &str) {
    headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value.to_string());
}

/// Compose `{base_url}/1/{tenant_id}/{path}`. One leading slash on `path` is dropped.
pub fn tenant_url(config: &ServiceConfig, path: &str) -> String {
    let path = path.strip_prefix('/').unwrap_or(path);
    format!(
        "{}/{}/{}/{}",
        config.base_url, API_VERSION_SEGMENT, config.tenant_id, path
    )
}

/// Build the transport request for `spec`.
///
/// Header precedence: caller headers, then the application id/key (always
/// win), then the session token when one is held, then a default content type
/// for raw bodies.
pub fn build(config: &ServiceConfig, session: &SessionState, spec: RequestSpec) -> PreparedRequest {
    let RequestSpec {
        method,
        path,
        query,
        json,
        body,
        mut headers,
        stream,
        timeout,
    } = spec;

    let url = tenant_url(config, &path);

    force_header(&mut headers, HEADER_APP_ID, &config.app_id);
    force_header(&mut headers, HEADER_APP_KEY, &config.app_key);

    if let Some(token) = session.token() {
        force_header(&mut headers, HEADER_SESSION_TOKEN, token);
    }

    let body = match (body, json) {
        (Some(bytes), _) => {
            if find_header(&headers, HEADER_CONTENT_TYPE).is_none() {
                headers.insert(
                    HEADER_CONTENT_TYPE.to_string(),
                    CONTENT_TYPE_OCTET_STREAM.to_string(),
                );
            }
            Some(RequestBody::Bytes(bytes))
        }
        (None, Some(value)) => Some(RequestBody::Json(value)),
        (None, None) => None,
    };

    PreparedRequest {
        method,
        url,
        query,
        headers,
        body,
        stream,
        timeout: timeout.or_else(|| config.timeout()),
    }
}
