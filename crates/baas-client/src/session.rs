//! Session token state.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{Error, ErrorKind, Result};

/// Current session token and its expiry (unix epoch seconds).
///
/// Token and expiry always change together: [`set`](Self::set) overwrites
/// both and [`clear`](Self::clear) drops both.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    token: Option<String>,
    expiry: Option<i64>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("expiry", &self.expiry)
            .finish()
    }
}

impl SessionState {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session holding the given token.
    pub fn with_token(token: impl Into<String>, expiry: i64) -> Self {
        Self {
            token: Some(token.into()),
            expiry: Some(expiry),
        }
    }

    /// Current session token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Token expiry as unix epoch seconds.
    pub fn expiry(&self) -> Option<i64> {
        self.expiry
    }

    /// Token expiry as a timestamp.
    pub fn expiry_time(&self) -> Option<DateTime<Utc>> {
        self.expiry
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    /// Returns true if a token is held.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Overwrite token and expiry.
    pub fn set(&mut self, token: impl Into<String>, expiry: i64) {
        self.token = Some(token.into());
        self.expiry = Some(expiry);
    }

    /// Drop token and expiry.
    pub fn clear(&mut self) {
        self.token = None;
        self.expiry = None;
    }

    /// Check that a token is held and has not expired.
    pub fn verify(&self) -> Result<()> {
        self.verify_at(Utc::now().timestamp())
    }

    /// Same as [`verify`](Self::verify) against an explicit clock.
    pub fn verify_at(&self, now: i64) -> Result<()> {
        if self.token.is_none() {
            return Err(Error::new(ErrorKind::NoSessionToken));
        }
        match self.expiry {
            Some(expiry) if expiry <= now => Err(Error::new(ErrorKind::SessionExpired)),
            _ => Ok(()),
        }
    }
}
