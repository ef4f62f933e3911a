//! Object query encoding with the long-query fallback.
//!
//! A query is normally sent as URL parameters on `GET {collection}`. When the
//! encoded parameter string would reach [`LONG_QUERY_THRESHOLD`] characters,
//! the same parameters are sent as a JSON body on `POST {collection}/_query`
//! instead, which keeps long filters clear of URL length limits in proxies and
//! servers.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::request::{RequestMethod, RequestSpec};

/// Encoded query-string length at which the POST form is used.
pub const LONG_QUERY_THRESHOLD: usize = 1500;

/// Path suffix of the long-query endpoint.
pub const LONG_QUERY_SUFFIX: &str = "_query";

/// Parameters of an object collection query.
///
/// Only parameters that are set are sent. `skip` is sent only when > 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectQuery {
    filter: Option<Value>,
    order: Option<String>,
    skip: u64,
    limit: Option<i64>,
    projection: Option<Value>,
    delete_mark: Option<bool>,
    count: bool,
}

impl ObjectQuery {
    /// Create an empty query (matches every object).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter condition (`where`), e.g. `{"score": {"$gt": 70}}`.
    pub fn filter(mut self, condition: Value) -> Self {
        self.filter = Some(condition);
        self
    }

    /// Sort order, e.g. `"-updatedAt,name"`.
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Field projection, e.g. `{"name": 1}`.
    pub fn projection(mut self, projection: Value) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Include soft-deleted objects.
    pub fn delete_mark(mut self, include_deleted: bool) -> Self {
        self.delete_mark = Some(include_deleted);
        self
    }

    /// Ask the server for the total match count.
    pub fn count(mut self, count: bool) -> Self {
        self.count = count;
        self
    }

    /// Parameters in URL form, structured values JSON-stringified.
    pub fn params(&self) -> Result<Vec<(String, String)>> {
        let mut params = Vec::new();
        if let Some(ref filter) = self.filter {
            params.push(("where".to_string(), serde_json::to_string(filter)?));
        }
        if let Some(ref order) = self.order {
            params.push(("order".to_string(), order.clone()));
        }
        if self.skip > 0 {
            params.push(("skip".to_string(), self.skip.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(ref projection) = self.projection {
            params.push(("projection".to_string(), serde_json::to_string(projection)?));
        }
        if let Some(delete_mark) = self.delete_mark {
            params.push(("deleteMark".to_string(), flag(delete_mark).to_string()));
        }
        if self.count {
            params.push(("count".to_string(), "1".to_string()));
        }
        Ok(params)
    }

    /// Parameters as a JSON body, structured values kept native.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        if let Some(ref filter) = self.filter {
            body.insert("where".to_string(), filter.clone());
        }
        if let Some(ref order) = self.order {
            body.insert("order".to_string(), Value::from(order.as_str()));
        }
        if self.skip > 0 {
            body.insert("skip".to_string(), Value::from(self.skip));
        }
        if let Some(limit) = self.limit {
            body.insert("limit".to_string(), Value::from(limit));
        }
        if let Some(ref projection) = self.projection {
            body.insert("projection".to_string(), projection.clone());
        }
        if let Some(delete_mark) = self.delete_mark {
            body.insert("deleteMark".to_string(), Value::from(flag(delete_mark)));
        }
        if self.count {
            body.insert("count".to_string(), Value::from(1));
        }
        Value::Object(body)
    }

    /// Decide between the URL form and the long-query form.
    pub fn encode(&self) -> Result<QueryPlan> {
        encode_query(self)
    }

    /// Build the request against `collection_path` (e.g. `objects/bucket1`).
    pub fn to_request(&self, collection_path: &str) -> Result<RequestSpec> {
        Ok(self.encode()?.into_request(collection_path))
    }
}

fn flag(value: bool) -> u8 {
    if value {
        1
    } else {
        0
    }
}

/// Query parameters in the form they will be sent.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedQuery {
    /// URL query parameters.
    Params(Vec<(String, String)>),
    /// JSON request body.
    Body(Value),
}

/// How a query goes out: method, optional path suffix and parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub method: RequestMethod,
    pub path_suffix: Option<&'static str>,
    pub encoded: EncodedQuery,
}

impl QueryPlan {
    /// Returns true if the long-query form was chosen.
    pub fn is_long_query(&self) -> bool {
        self.path_suffix.is_some()
    }

    /// Build the request against `collection_path`.
    pub fn into_request(self, collection_path: &str) -> RequestSpec {
        let collection_path = collection_path.trim_end_matches('/');
        let path = match self.path_suffix {
            Some(suffix) => format!("{}/{}", collection_path, suffix),
            None => collection_path.to_string(),
        };
        let spec = RequestSpec::new(self.method, path);
        match self.encoded {
            EncodedQuery::Params(params) => spec.query_pairs(params),
            EncodedQuery::Body(body) => spec.json_value(body),
        }
    }
}

/// Length of the URL-encoded query string for `params`.
pub fn encoded_len(params: &[(String, String)]) -> Result<usize> {
    Ok(serde_urlencoded::to_string(params)?.len())
}

/// Choose `GET` with URL parameters when the encoded string is shorter than
/// [`LONG_QUERY_THRESHOLD`], else `POST .../_query` with a JSON body.
pub fn encode_query(query: &ObjectQuery) -> Result<QueryPlan> {
    let params = query.params()?;
    let len = encoded_len(&params)?;

    if len < LONG_QUERY_THRESHOLD {
        Ok(QueryPlan {
            method: RequestMethod::Get,
            path_suffix: None,
            encoded: EncodedQuery::Params(params),
        })
    } else {
        tracing::debug!(encoded_len = len, "Using long query");
        Ok(QueryPlan {
            method: RequestMethod::Post,
            path_suffix: Some(LONG_QUERY_SUFFIX),
            encoded: EncodedQuery::Body(query.body()),
        })
    }
}
