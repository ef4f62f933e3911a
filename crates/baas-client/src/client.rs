//! Transport: dispatches prepared requests and classifies error statuses.

use tracing::{debug, instrument, warn};

use crate::config::{proxy_url, ServiceConfig};
use crate::error::{Error, ErrorKind, Result};
use crate::request::{PreparedRequest, RequestBody};
use crate::response::Response;

/// HTTP client for the BaaS REST API.
///
/// Proxies and certificate verification come from the [`ServiceConfig`] the
/// client is built from and apply to every request it sends. No request is
/// ever retried.
#[derive(Debug, Clone)]
pub struct BaasHttpClient {
    inner: reqwest::Client,
}

impl BaasHttpClient {
    /// Create a new HTTP client for the given configuration.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(crate::USER_AGENT);

        if let Some(ref proxy) = config.proxy {
            if let Some(ref http) = proxy.http {
                builder = builder.proxy(reqwest::Proxy::http(proxy_url(http))?);
            }
            if let Some(ref https) = proxy.https {
                builder = builder.proxy(reqwest::Proxy::https(proxy_url(https))?);
            }
        }

        if !config.verify_server_cert {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let inner = builder
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner })
    }

    /// Send one request.
    ///
    /// Status >= 400 becomes an error carrying status and body. Unless the
    /// request is streamed, the body of a successful response is read
    /// completely before returning.
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn execute(&self, request: PreparedRequest) -> Result<Response> {
        let mut url = url::Url::parse(&request.url)?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        let mut req = self.inner.request(request.method.to_reqwest(), url);

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        if let Some(body) = request.body {
            req = match body {
                RequestBody::Json(value) => req.json(&value),
                RequestBody::Bytes(bytes) => req.body(bytes),
            };
        }

        debug!(method = %request.method, url = %request.url, "Sending request");

        let response = req.send().await?;
        let status = response.status().as_u16();

        if status >= 400 {
            return Err(match response.text().await {
                Ok(body) => {
                    warn!(status, body = %body, "HTTP request error");
                    Error::from_status(status, body)
                }
                Err(e) => {
                    warn!(status, error = %e, "HTTP request error, body unreadable");
                    let mut err = Error::from_status(status, String::new());
                    err.source = Some(Box::new(e));
                    err
                }
            });
        }

        debug!(status, content_length = response.content_length(), "Response received");

        if request.stream {
            Ok(Response::streaming(response))
        } else {
            Response::buffered(response).await
        }
    }
}
