//! HTTP response handling.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Response body, either fully read or still on the wire.
#[derive(Debug)]
enum Body {
    Buffered(Option<Bytes>),
    Streaming(reqwest::Response),
}

/// Successful (status < 400) response of one REST call.
///
/// Non-streamed responses are read completely before they are returned;
/// streamed ones are read on demand via [`chunk`](Self::chunk).
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: Body,
}

impl Response {
    /// Read the whole body now.
    pub(crate) async fn buffered(inner: reqwest::Response) -> Result<Self> {
        let status = inner.status().as_u16();
        let headers = inner.headers().clone();
        let bytes = inner.bytes().await?;
        Ok(Self {
            status,
            headers,
            body: Body::Buffered(Some(bytes)),
        })
    }

    /// Leave the body on the wire.
    pub(crate) fn streaming(inner: reqwest::Response) -> Self {
        Self {
            status: inner.status().as_u16(),
            headers: inner.headers().clone(),
            body: Body::Streaming(inner),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true if the body is read on demand.
    pub fn is_streaming(&self) -> bool {
        matches!(self.body, Body::Streaming(_))
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Get the ETag header value.
    pub fn etag(&self) -> Option<&str> {
        self.header("etag")
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get the Content-Length header.
    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length")?.parse().ok()
    }

    /// Read the next chunk of the body. `None` once the body is exhausted.
    ///
    /// For a buffered response the whole body is returned as one chunk; an
    /// empty body yields no chunk at all, as it would when streamed.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        match &mut self.body {
            Body::Buffered(bytes) => Ok(bytes.take().filter(|b| !b.is_empty())),
            Body::Streaming(inner) => inner.chunk().await.map_err(Into::into),
        }
    }

    /// Get the response body as bytes.
    pub async fn bytes(self) -> Result<Bytes> {
        match self.body {
            Body::Buffered(bytes) => Ok(bytes.unwrap_or_default()),
            Body::Streaming(inner) => inner.bytes().await.map_err(Into::into),
        }
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Deserialize the response body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }
}
