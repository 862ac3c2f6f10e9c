//! Credential storage
//!
//! Credentials are kept as plaintext string entries under fixed keys, the
//! same shape the admin panel keeps in browser local storage.

use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::api::User;

pub const TOKEN_KEY: &str = "adminToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "adminUser";
/// Older clients stored the user here; it is only ever cleared
pub const LEGACY_USER_KEY: &str = "user";

const ALL_KEYS: [&str; 4] = [TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY, LEGACY_USER_KEY];

/// String key/value storage for credentials
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);

    /// Stored bearer token
    fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    fn refresh_token(&self) -> Option<String> {
        self.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Stored user record; unreadable records count as missing
    fn user(&self) -> Option<User> {
        let raw = self.get(USER_KEY).or_else(|| self.get(LEGACY_USER_KEY))?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring unreadable stored user: {}", e);
                None
            }
        }
    }

    /// Persist a fresh login
    fn save_login(&self, token: &str, refresh_token: Option<&str>, user: &User) {
        self.set(TOKEN_KEY, token);
        match refresh_token {
            Some(refresh) => self.set(REFRESH_TOKEN_KEY, refresh),
            None => self.remove(REFRESH_TOKEN_KEY),
        }
        match serde_json::to_string(user) {
            Ok(json) => self.set(USER_KEY, &json),
            Err(e) => tracing::warn!("Could not store user record: {}", e),
        }
    }

    /// Remove every credential entry
    fn clear(&self) {
        for key in ALL_KEYS {
            self.remove(key);
        }
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<IndexMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.shift_remove(key);
        }
    }
}

/// Store persisted as a JSON object on disk
///
/// Every write rewrites the whole file. Write failures are logged and the
/// in-memory copy stays authoritative for the rest of the process.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<IndexMap<String, String>>,
}

impl FileStore {
    /// Open a store, starting empty when the file is missing or unreadable
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Session file {:?} is corrupt, starting fresh: {}", path, e);
                IndexMap::new()
            }),
            Err(_) => IndexMap::new(),
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &IndexMap<String, String>) {
        let result = (|| -> std::io::Result<()> {
            if entries.is_empty() {
                if self.path.exists() {
                    fs::remove_file(&self.path)?;
                }
                return Ok(());
            }
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(entries)?;
            fs::write(&self.path, content)
        })();

        if let Err(e) = result {
            tracing::warn!("Failed to write session file {:?}: {}", self.path, e);
        }
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
            self.persist(&entries);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            if entries.shift_remove(key).is_some() {
                self.persist(&entries);
            }
        }
    }
}
