//! Session token storage for reusing a login across processes.

use std::path::{Path, PathBuf};

use baas_client::{Service, SessionState};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, ErrorKind, Result};

/// File name of the session token file.
pub const SESSION_TOKEN_FILE_NAME: &str = "session_token.json";

/// Trait for session storage implementations.
pub trait SessionStorage: Send + Sync {
    /// Save a session. Fails if no token is held.
    fn save(&self, session: &SessionState) -> Result<()>;

    /// Load the stored session, `None` if nothing is stored.
    fn load(&self) -> Result<Option<SessionState>>;

    /// Delete the stored session. Deleting nothing is not an error.
    fn delete(&self) -> Result<()>;

    /// Check if a session is stored.
    fn exists(&self) -> Result<bool>;

    /// Save the session currently held by `service`.
    fn save_from(&self, service: &Service) -> Result<()> {
        self.save(&service.session())
    }

    /// Replace the session of `service` with the stored one.
    ///
    /// When nothing is stored the session of `service` is cleared.
    fn restore(&self, service: &Service) -> Result<()> {
        match self.load()? {
            Some(session) => service.replace_session(session),
            None => service.clear_session(),
        }
        Ok(())
    }
}

/// File-based session storage.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Create a new file session storage with the default path.
    ///
    /// Default path: `~/.baas/rust/session_token.json`
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: default_session_path()?,
        })
    }

    /// Create a new file session storage with a custom file path.
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl SessionStorage for FileSessionStorage {
    fn save(&self, session: &SessionState) -> Result<()> {
        let token = session
            .token()
            .ok_or_else(|| Error::from(baas_client::Error::new(baas_client::ErrorKind::NoSessionToken)))?;

        self.ensure_dir()?;

        let stored = StoredSession {
            session_token: Some(token.to_string()),
            session_token_expire: session.expiry(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.path, json)?;

        // Set restrictive permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)?;
        }

        debug!(path = %self.path.display(), "Session token saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<SessionState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(&self.path)?;
        let stored: StoredSession = serde_json::from_str(&json)?;

        let token = stored.session_token.ok_or_else(|| {
            Error::new(ErrorKind::InvalidSessionFile("No sessionToken".to_string()))
        })?;
        let expire = stored.session_token_expire.ok_or_else(|| {
            Error::new(ErrorKind::InvalidSessionFile(
                "No sessionTokenExpire".to_string(),
            ))
        })?;

        Ok(Some(SessionState::with_token(token, expire)))
    }

    fn delete(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn exists(&self) -> Result<bool> {
        Ok(self.path.exists())
    }
}

/// On-disk form of a session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    session_token: Option<String>,
    session_token_expire: Option<i64>,
}

/// Get the default session file path.
pub fn default_session_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::new(ErrorKind::Config("Could not find home directory".to_string())))?;

    Ok(home.join(".baas").join("rust").join(SESSION_TOKEN_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use baas_client::ServiceConfig;
    use tempfile::TempDir;

    fn test_service() -> Service {
        Service::new(ServiceConfig::new("http://localhost/api", "t1", "a1", "k1")).unwrap()
    }

    fn storage_in(dir: &TempDir) -> FileSessionStorage {
        FileSessionStorage::with_path(dir.path().join(SESSION_TOKEN_FILE_NAME))
    }

    #[test]
    fn test_file_storage_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = storage_in(&temp_dir);

        storage
            .save(&SessionState::with_token("TOK", 1_700_000_000))
            .unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.token(), Some("TOK"));
        assert_eq!(loaded.expiry(), Some(1_700_000_000));
    }

    #[test]
    fn test_file_format() {
        let temp_dir = TempDir::new().unwrap();
        let storage = storage_in(&temp_dir);

        storage.save(&SessionState::with_token("TOK", 999)).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(storage.path()).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"sessionToken": "TOK", "sessionTokenExpire": 999})
        );
    }

    #[test]
    fn test_save_without_token_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = storage_in(&temp_dir);

        let err = storage.save(&SessionState::new()).unwrap_err();
        assert!(err.is_session_error());
        assert!(!storage.exists().unwrap());
    }

    #[test]
    fn test_save_creates_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            FileSessionStorage::with_path(temp_dir.path().join("nested").join("session.json"));

        storage.save(&SessionState::with_token("TOK", 1)).unwrap();
        assert!(storage.exists().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let storage = storage_in(&temp_dir);
        storage.save(&SessionState::with_token("TOK", 1)).unwrap();

        let mode = std::fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = storage_in(&temp_dir);
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_load_missing_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = storage_in(&temp_dir);

        std::fs::write(storage.path(), r#"{"sessionTokenExpire": 1}"#).unwrap();
        let err = storage.load().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidSessionFile(ref m) if m == "No sessionToken"));

        std::fs::write(storage.path(), r#"{"sessionToken": "TOK"}"#).unwrap();
        let err = storage.load().unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::InvalidSessionFile(ref m) if m == "No sessionTokenExpire")
        );
    }

    #[test]
    fn test_file_storage_delete() {
        let temp_dir = TempDir::new().unwrap();
        let storage = storage_in(&temp_dir);

        storage.save(&SessionState::with_token("TOK", 1)).unwrap();
        assert!(storage.exists().unwrap());

        storage.delete().unwrap();
        assert!(!storage.exists().unwrap());

        // Deleting again is a no-op
        storage.delete().unwrap();
    }

    #[test]
    fn test_round_trip_through_services() {
        let temp_dir = TempDir::new().unwrap();
        let storage = storage_in(&temp_dir);

        let first = test_service();
        first.set_session("TOK", 1_900_000_000);
        storage.save_from(&first).unwrap();

        let second = test_service();
        storage.restore(&second).unwrap();
        assert_eq!(second.session(), first.session());
    }

    #[test]
    fn test_restore_missing_file_clears_session() {
        let temp_dir = TempDir::new().unwrap();
        let storage = storage_in(&temp_dir);

        let service = test_service();
        service.set_session("OLD", 1);
        storage.restore(&service).unwrap();

        assert!(service.session_token().is_none());
        assert!(service.session_expiry().is_none());
    }
}
