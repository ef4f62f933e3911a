//! Helpers shared by the resource wrappers.

use std::borrow::Cow;

use baas_client::{RequestSpec, Service};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// List response of the form `{"results": [...], "count": n}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultList<T> {
    pub results: Vec<T>,
    /// Total number of matches, present when requested.
    #[serde(default)]
    pub count: Option<i64>,
}

/// Percent-encode one caller-supplied path segment.
pub(crate) fn segment<'a>(what: &str, value: &'a str) -> Result<Cow<'a, str>> {
    if value.is_empty() {
        return Err(Error::invalid_input(format!("{} is empty", what)));
    }
    Ok(urlencoding::encode(value))
}

/// Send a call and decode its JSON body, `Null` for an empty body.
pub(crate) async fn execute_value(service: &Service, spec: RequestSpec) -> Result<Value> {
    let body = service.execute(spec).await?.bytes().await?;
    if body.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&body)?)
}

/// Send a call returning a `results` list.
pub(crate) async fn execute_results<T: DeserializeOwned>(
    service: &Service,
    spec: RequestSpec,
) -> Result<ResultList<T>> {
    Ok(service.execute_json(spec).await?)
}

/// `1` / `0` flag as the server expects it in query strings.
pub(crate) fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}
