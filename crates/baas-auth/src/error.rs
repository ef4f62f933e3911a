//! Error types for baas-auth.
//!
//! Error messages never include passwords or session tokens.

/// Result type alias for baas-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for baas-auth operations.
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

    /// Returns true if the server answered 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns true if no live session token is held.
    pub fn is_session_error(&self) -> bool {
        matches!(
            self.client_kind(),
            Some(baas_client::ErrorKind::NoSessionToken | baas_client::ErrorKind::SessionExpired)
        )
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

    /// Session file is malformed.
    #[error("Invalid session file: {0}")]
    InvalidSessionFile(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

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

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}
