//! Error types for baas-client.

use std::fmt;

/// Result type alias for baas-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for baas-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Create an error for a response with status >= 400.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        Self::new(classify(status, body))
    }

    /// HTTP status code, when the server answered with an error status.
    pub fn status(&self) -> Option<u16> {
        self.envelope().map(|e| e.status)
    }

    /// Status, raw body and parsed payload of a failed call.
    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        self.kind.envelope()
    }

    /// Returns true for HTTP 400.
    pub fn is_bad_request(&self) -> bool {
        matches!(self.kind, ErrorKind::BadRequest(_))
    }

    /// Returns true for HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.kind, ErrorKind::Unauthorized(_))
    }

    /// Returns true for HTTP 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound(_))
    }

    /// Returns true for HTTP 409 (ETag mismatch).
    pub fn is_conflict(&self) -> bool {
        matches!(self.kind, ErrorKind::Conflict(_))
    }

    /// Returns true for HTTP 5xx.
    pub fn is_server_error(&self) -> bool {
        matches!(self.kind, ErrorKind::ServerError(_))
    }

    /// Returns true for session verification failures.
    pub fn is_session_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::NoSessionToken | ErrorKind::SessionExpired
        )
    }
}

/// Details of a call that the server rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEnvelope {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
    /// Response body parsed as JSON, when it is JSON.
    pub payload: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    /// Build an envelope, parsing the body as JSON when possible.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let payload = serde_json::from_str(&body).ok();
        Self {
            status,
            body,
            payload,
        }
    }

    /// Server-side error message, if the payload carries one.
    pub fn message(&self) -> Option<&str> {
        let payload = self.payload.as_ref()?;
        payload
            .get("error")
            .or_else(|| payload.get("message"))
            .and_then(|v| v.as_str())
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "{} {}", self.status, message),
            None if self.body.is_empty() => write!(f, "{}", self.status),
            None => write!(f, "{} {}", self.status, truncate(&self.body, 200)),
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Missing or invalid service configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP method outside GET/POST/PUT/DELETE.
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    /// HTTP 400.
    #[error("Bad request: {0}")]
    BadRequest(ErrorEnvelope),

    /// HTTP 401.
    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorEnvelope),

    /// HTTP 404.
    #[error("Not found: {0}")]
    NotFound(ErrorEnvelope),

    /// HTTP 409 - ETag mismatch on update.
    #[error("Conflict: {0}")]
    Conflict(ErrorEnvelope),

    /// HTTP 5xx.
    #[error("Server error: {0}")]
    ServerError(ErrorEnvelope),

    /// Any other HTTP status >= 400.
    #[error("HTTP error: {0}")]
    Http(ErrorEnvelope),

    /// No session token is held.
    #[error("No session token")]
    NoSessionToken,

    /// The session token expiry has passed.
    #[error("Session token is expired")]
    SessionExpired,

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML configuration file error.
    #[error("YAML error: {0}")]
    Yaml(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ErrorKind {
    /// The envelope of an HTTP error kind.
    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            ErrorKind::BadRequest(e)
            | ErrorKind::Unauthorized(e)
            | ErrorKind::NotFound(e)
            | ErrorKind::Conflict(e)
            | ErrorKind::ServerError(e)
            | ErrorKind::Http(e) => Some(e),
            _ => None,
        }
    }
}

/// Map an HTTP error status and body to an error kind.
pub fn classify(status: u16, body: impl Into<String>) -> ErrorKind {
    let envelope = ErrorEnvelope::new(status, body);
    match status {
        400 => ErrorKind::BadRequest(envelope),
        401 => ErrorKind::Unauthorized(envelope),
        404 => ErrorKind::NotFound(envelope),
        409 => ErrorKind::Conflict(envelope),
        s if s >= 500 => ErrorKind::ServerError(envelope),
        _ => ErrorKind::Http(envelope),
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if err.is_builder() {
            ErrorKind::Config(err.to_string())
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::with_source(ErrorKind::Yaml(err.to_string()), err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(format!("Invalid URL: {}", err)), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Other(err.to_string()), err)
    }
}
