//! Application configuration management.
//!
//! Holds the gateway base URL, which session store to use and a couple of
//! timing knobs. Stored at `~/.config/crm-client/config.json`; the base URL can
//! be overridden with `CRM_BASE_URL`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::{FileSessionStore, KeyringSessionStore, MemorySessionStore, SessionStore};

/// Application name used for config/data directory paths
const APP_NAME: &str = "crm-client";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides `base_url`
pub const BASE_URL_ENV: &str = "CRM_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const DEFAULT_REDIRECT_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    /// `session.json` in the data directory
    File,
    /// OS keychain. On Linux this is the kernel keyutils session keyring, so the
    /// token is gone once the login session ends.
    Keyring,
    /// Process memory only; every run starts logged out
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub store: StoreKind,
    pub login_redirect_delay_ms: u64,
    /// No timeout unless set
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            store: StoreKind::default(),
            login_redirect_delay_ms: DEFAULT_REDIRECT_DELAY_MS,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load the config file (or defaults) and apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Self::parse(&contents)?
        } else {
            Self::default()
        };
        config.apply_base_url_override(std::env::var(BASE_URL_ENV).ok());
        debug!(base_url = %config.base_url, store = ?config.store, "Configuration loaded");
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse config file")
    }

    fn apply_base_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the session file and logs
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn login_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.login_redirect_delay_ms)
    }

    /// Open the session store selected by `store`
    pub fn open_store(&self) -> Result<Arc<dyn SessionStore>> {
        let store: Arc<dyn SessionStore> = match self.store {
            StoreKind::File => Arc::new(FileSessionStore::new(self.data_dir()?)),
            StoreKind::Keyring => Arc::new(KeyringSessionStore::new()),
            StoreKind::Memory => Arc::new(MemorySessionStore::new()),
        };
        Ok(store)
    }
}
