//! The local credential store: one named entry holding the API token.
//!
//! Loaded at startup and written through on every change. The core pipeline
//! never reads it; the resolved key is injected into the client builder at
//! the interface edge.

use crate::error::{NanoBrandError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the stored credential entry.
pub const CREDENTIAL_KEY: &str = "user_gemini_api_key";

/// File-backed key-value store with a single well-known entry.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Opens a store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the per-user default store: `$NANOBRAND_HOME/credentials.json`
    /// if set, otherwise `~/.config/nanobrand/credentials.json`.
    pub fn open_default() -> Result<Self> {
        let dir = match std::env::var_os("NANOBRAND_HOME") {
            Some(home) => PathBuf::from(home),
            None => {
                let home = std::env::var_os("HOME").ok_or_else(|| {
                    NanoBrandError::InvalidRequest(
                        "neither NANOBRAND_HOME nor HOME is set".into(),
                    )
                })?;
                Path::new(&home).join(".config").join("nanobrand")
            }
        };
        Ok(Self::at(dir.join("credentials.json")))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored token. A missing file means no credential yet.
    pub fn load(&self) -> Result<Option<String>> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let entries: BTreeMap<String, String> = serde_json::from_str(&json)?;
        Ok(entries
            .get(CREDENTIAL_KEY)
            .filter(|v| !v.trim().is_empty())
            .cloned())
    }

    /// Writes the token through to disk.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut entries = BTreeMap::new();
        entries.insert(CREDENTIAL_KEY.to_string(), token.to_string());
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }

    /// Removes the stored credential, if any.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
