//! Session persistence: two string values under fixed keys.
//!
//! The original client kept an opaque auth token and a JSON-serialized user
//! record in local storage. [SessionStore] reproduces that protocol over a
//! pluggable key-value backend; a restore that finds a corrupt user record
//! clears both keys rather than surfacing a broken session.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::auth::Session;
use crate::ecs::User;

pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const USER_DATA_KEY: &str = "user_data";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("session record encoding: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Minimal string key-value storage seam.
pub trait KeyValueBackend {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: String) -> Result<(), SessionError>;
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;
}

/// In-memory backend; state dies with the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Single-JSON-file backend. The whole map is rewritten on every mutation;
/// session state is two short strings, so that stays cheap.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileBackend {
    /// Opens `path`, loading existing entries. A missing file is an empty
    /// store; a malformed file is replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                log::warn!("session file {} unreadable: {err}", path.display());
                HashMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), SessionError> {
        let raw = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Persists and restores the signed-in session.
pub struct SessionStore<B> {
    backend: B,
}

impl<B: KeyValueBackend> SessionStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn persist(&mut self, session: &Session) -> Result<(), SessionError> {
        self.backend
            .put(AUTH_TOKEN_KEY, session.token.clone())?;
        self.backend
            .put(USER_DATA_KEY, serde_json::to_string(&session.user)?)
    }

    /// Restores the stored session, if any. A corrupt user record clears
    /// the store and restores nothing.
    pub fn restore(&mut self) -> Result<Option<Session>, SessionError> {
        let (Some(token), Some(raw_user)) = (
            self.backend.get(AUTH_TOKEN_KEY),
            self.backend.get(USER_DATA_KEY),
        ) else {
            return Ok(None);
        };
        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => Ok(Some(Session { user, token })),
            Err(err) => {
                log::warn!("stored user record corrupt, clearing session: {err}");
                self.clear()?;
                Ok(None)
            }
        }
    }

    /// Logs out: removes both values.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.backend.remove(AUTH_TOKEN_KEY)?;
        self.backend.remove(USER_DATA_KEY)
    }
}
