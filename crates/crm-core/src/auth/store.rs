//! Persistent storage for the session credential.
//!
//! The store holds two entries: the bearer token and the last username that
//! logged in. Everything that needs the token receives an `Arc<dyn SessionStore>`
//! rather than reaching for a global.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use keyring::Entry;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Key under which the bearer token is stored
pub const TOKEN_KEY: &str = "token";

/// Key under which the last-known username is stored
pub const USERNAME_KEY: &str = "username";

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// Keychain service name
const SERVICE_NAME: &str = "crm-client";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed session file: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Session store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Key-value store for session state, scoped to one client installation.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;

    fn token(&self) -> StoreResult<Option<String>> {
        Ok(self.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    fn set_token(&self, token: &str) -> StoreResult<()> {
        self.set(TOKEN_KEY, token)
    }

    fn clear_token(&self) -> StoreResult<()> {
        self.remove(TOKEN_KEY)
    }

    fn username(&self) -> StoreResult<Option<String>> {
        self.get(USERNAME_KEY)
    }

    fn set_username(&self, username: &str) -> StoreResult<()> {
        self.set(USERNAME_KEY, username)
    }

    fn clear_username(&self) -> StoreResult<()> {
        self.remove(USERNAME_KEY)
    }
}

/// In-process store. Nothing survives the process; used by tests and `store = "memory"`.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(TOKEN_KEY.to_string(), token.to_string());
        }
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    entries: HashMap<String, String>,
}

/// JSON file in the data directory, rewritten on every change.
pub struct FileSessionStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            lock: Mutex::new(()),
        }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    fn read(&self) -> StoreResult<SessionFile> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(SessionFile::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write(&self, file: &SessionFile) -> StoreResult<()> {
        let path = self.session_path();
        if file.entries.is_empty() {
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
            return Ok(());
        }
        std::fs::create_dir_all(&self.dir)?;
        let contents = serde_json::to_string_pretty(file)?;
        std::fs::write(&path, contents)?;
        debug!(path = %path.display(), "Session file written");
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.read()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut file = self.read()?;
        file.entries.insert(key.to_string(), value.to_string());
        self.write(&file)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut file = self.read()?;
        if file.entries.remove(key).is_some() {
            self.write(&file)?;
        }
        Ok(())
    }
}

/// OS keychain. Each key becomes one keychain entry under the `crm-client` service.
pub struct KeyringSessionStore {
    service: String,
}

impl KeyringSessionStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    fn entry(&self, key: &str) -> StoreResult<Entry> {
        Ok(Entry::new(&self.service, key)?)
    }
}

impl Default for KeyringSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for KeyringSessionStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entry(key)?.set_password(value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
