use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::config::{Config, StorageMode};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("persist error: {0}")]
    Persist(String),
    #[error("Token storage is set to env-only.")]
    EnvOnly,
}

/// One token backend. Absence on read is `Ok(None)`; only a backend that is
/// genuinely broken returns `Err`, and the chain degrades past it.
pub trait TokenStore: Send + Sync {
    fn label(&self) -> &'static str;
    fn read(&self) -> Result<Option<String>, StoreError>;
    fn write(&self, token: &str) -> Result<(), StoreError>;
    fn available(&self) -> bool;
}

/// Where a successful write landed, plus a warning when an earlier backend
/// was skipped over.
#[derive(Debug, Clone)]
pub struct TokenWriteOutcome {
    pub destination: &'static str,
    pub warning: Option<String>,
}

/// OS credential store entry (service/account pair).
pub struct KeyringTokenStore {
    service: String,
    account: String,
}

impl KeyringTokenStore {
    pub fn new(service: &str, account: &str) -> Self {
        Self {
            service: service.to_string(),
            account: account.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, StoreError> {
        keyring::Entry::new(&self.service, &self.account)
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl TokenStore for KeyringTokenStore {
    fn label(&self) -> &'static str {
        "keychain"
    }

    fn read(&self) -> Result<Option<String>, StoreError> {
        match self.entry()?.get_password() {
            Ok(token) if !token.is_empty() => Ok(Some(token)),
            Ok(_) => Ok(None),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }

    fn write(&self, token: &str) -> Result<(), StoreError> {
        self.entry()?
            .set_password(token)
            .map_err(|e| StoreError::Persist(e.to_string()))
    }

    fn available(&self) -> bool {
        match keyring::Entry::new(&self.service, &self.account) {
            Ok(entry) => !matches!(
                entry.get_password(),
                Err(keyring::Error::PlatformFailure(_)) | Err(keyring::Error::NoStorageAccess(_))
            ),
            Err(_) => false,
        }
    }
}

/// File-backed token: a JSON object `{"token": "..."}`. Content that does
/// not parse as JSON is accepted as a raw token string, so a hand-written
/// file with just the token in it works too.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn label(&self) -> &'static str {
        "file"
    }

    fn read(&self) -> Result<Option<String>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Unavailable(e.to_string())),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(parsed) => Ok(parsed
                .get("token")
                .and_then(Value::as_str)
                .map(str::to_string)),
            Err(_) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
        }
    }

    fn write(&self, token: &str) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::Persist(e.to_string()))?;
        }
        let body = serde_json::json!({ "token": token }).to_string();
        std::fs::write(&self.path, &body).map_err(|e| StoreError::Persist(e.to_string()))?;

        // Set restrictive permissions on Unix (owner read/write only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)
                .map_err(|e| StoreError::Persist(format!("chmod: {}", e)))?;
        }

        Ok(())
    }

    fn available(&self) -> bool {
        true
    }
}

/// Ordered token backends behind a single read/write surface. The env
/// override sits in front of every backend on read; writes go to the first
/// backend that accepts them.
pub struct TokenChain {
    mode: StorageMode,
    env_var: String,
    stores: Vec<Box<dyn TokenStore>>,
}

impl TokenChain {
    pub fn new(
        mode: StorageMode,
        env_var: impl Into<String>,
        stores: Vec<Box<dyn TokenStore>>,
    ) -> Self {
        TokenChain {
            mode,
            env_var: env_var.into(),
            stores,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let stores: Vec<Box<dyn TokenStore>> = match config.storage {
            StorageMode::Env => Vec::new(),
            StorageMode::File => vec![Box::new(FileTokenStore::new(config.token_file.clone()))],
            StorageMode::Keychain => vec![
                Box::new(KeyringTokenStore::new(
                    &config.keychain_service,
                    &config.keychain_account,
                )),
                Box::new(FileTokenStore::new(config.token_file.clone())),
            ],
        };
        TokenChain::new(config.storage, config.token_env_var.clone(), stores)
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    /// Resolve the current token. Absence is `None`, never an error; a
    /// backend that fails to read is logged and the next one is tried.
    pub fn read(&self, allow_env: bool) -> Option<String> {
        if allow_env {
            if let Ok(value) = std::env::var(&self.env_var) {
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
        for store in &self.stores {
            match store.read() {
                Ok(Some(token)) => return Some(token),
                Ok(None) => {}
                Err(e) => {
                    warn!(store = store.label(), error = %e, "token read failed, trying next backend");
                }
            }
        }
        None
    }

    /// Persist the token. Env-only mode has no write path and refuses
    /// deterministically; a failing backend falls through to the next one,
    /// with the failure reported as a warning on the successful outcome.
    pub fn write(&self, token: &str) -> Result<TokenWriteOutcome, StoreError> {
        if self.mode == StorageMode::Env {
            return Err(StoreError::EnvOnly);
        }
        let mut warning: Option<String> = None;
        let mut last_err: Option<StoreError> = None;
        for store in &self.stores {
            match store.write(token) {
                Ok(()) => {
                    return Ok(TokenWriteOutcome {
                        destination: store.label(),
                        warning,
                    });
                }
                Err(e) => {
                    warn!(store = store.label(), error = %e, "token write failed");
                    warning = Some(format!("{} write failed: {}", store.label(), e));
                    last_err = Some(e);
                }
            }
        }
        Err(last_err
            .unwrap_or_else(|| StoreError::Persist("no token backends configured".to_string())))
    }

    /// Whether the OS credential store is part of this chain and reachable.
    pub fn secure_store_available(&self) -> bool {
        self.stores
            .iter()
            .any(|s| s.label() == "keychain" && s.available())
    }
}
