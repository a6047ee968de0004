//! services/client/src/adapters/storage.rs
//!
//! This module contains the durable credential storage adapters, the concrete
//! implementations of the `CredentialStore` port from the `core` crate. The
//! file-backed store plays the role the browser's localStorage plays in the
//! reference system: a small JSON object read at startup and rewritten on
//! every credential change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use recipe_browser_core::ports::CredentialStore;
use tracing::warn;

//=========================================================================================
// File-Backed Store
//=========================================================================================

/// A `CredentialStore` persisted as a single JSON object file.
///
/// Missing or unreadable files behave as an empty store; writes replace the
/// whole file. All access goes through one lock so read-modify-write cycles
/// never interleave.
pub struct FileCredentialStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileCredentialStore {
    /// Opens the store at `path`, loading any existing entries.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Mutex::new(load_entries(&path));
        Self { path, entries }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) {
        let payload = match serde_json::to_string_pretty(entries) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize session file: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, payload) {
            warn!("Failed to write session file {}: {e}", self.path.display());
        }
    }
}

fn load_entries(path: &Path) -> BTreeMap<String, String> {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return BTreeMap::new();
    };
    match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Ignoring malformed session file {}: {e}", path.display());
            BTreeMap::new()
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}

//=========================================================================================
// In-Memory Store
//=========================================================================================

/// A `CredentialStore` with no persistence, for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }
}
