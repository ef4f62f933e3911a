//! Error types for baas-rest.

/// Result type alias for baas-rest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for baas-rest operations.
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

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput(message.into()))
    }

    /// HTTP status of a failed REST call, if that is what this error is.
    pub fn status(&self) -> Option<u16> {
        self.client_kind()?.envelope().map(|e| e.status)
    }

    /// The underlying client error kind, if any.
    pub fn client_kind(&self) -> Option<&baas_client::ErrorKind> {
        match &self.kind {
            ErrorKind::Client(kind) => Some(kind),
            _ => None,
        }
    }

    /// Returns true for HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns true for HTTP 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true for HTTP 409 (ETag mismatch).
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Error from the REST core (HTTP status, transport, session state).
    #[error("{0}")]
    Client(baas_client::ErrorKind),

    /// Invalid argument, rejected before any request is sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<baas_client::Error> for Error {
    fn from(err: baas_client::Error) -> Self {
        Self {
            kind: ErrorKind::Client(err.kind),
            source: err.source,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}
