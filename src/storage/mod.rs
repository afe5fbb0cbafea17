//! Client-local storage
//!
//! The bearer token issued at login lives in the system keyring; the last
//! selected chat topic lives in a small JSON file in the user's data
//! directory. When the keyring is unavailable the token falls back to that
//! file, which is only ever readable by its owner.

use crate::error::{Result, SecquizError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const KEYRING_SERVICE: &str = "secquiz";
const KEYRING_USER: &str = "access_token";

/// Values persisted in the JSON file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredState {
    /// Only set when the keyring could not take the token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_topic: Option<String>,
}

/// Where the bearer token is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenVault {
    /// System keyring, falling back to the store file
    Keyring,
    /// Store file only
    File,
}

/// Token and topic store
///
/// Every setter writes through.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    state: StoredState,
    vault: TokenVault,
    token: Option<String>,
}

impl LocalStore {
    /// Open the store in the default data directory, token in the keyring
    ///
    /// `SECQUIZ_DATA_FILE` overrides the location and keeps the token in
    /// that file.
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var("SECQUIZ_DATA_FILE") {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "secquiz", "secquiz")
            .ok_or_else(|| SecquizError::Storage("Could not determine data directory".into()))?;

        Self::open(proj_dirs.data_dir().join("client.json"), TokenVault::Keyring)
    }

    /// Open the store at an explicit path, token in the same file
    ///
    /// # Examples
    ///
    /// ```
    /// use secquiz::storage::LocalStore;
    ///
    /// let dir = tempfile::TempDir::new().unwrap();
    /// let store = LocalStore::new_with_path(dir.path().join("client.json")).unwrap();
    /// assert!(store.token().is_none());
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        Self::open(path.into(), TokenVault::File)
    }

    /// Open the store at `path` with the token kept in `vault`
    pub fn open(path: PathBuf, vault: TokenVault) -> Result<Self> {
        let state = read_state(&path)?;
        let token = match vault {
            TokenVault::File => state.token.clone(),
            TokenVault::Keyring => match load_keyring_token() {
                Ok(Some(token)) => Some(token),
                Ok(None) => state.token.clone(),
                Err(e) => {
                    tracing::warn!("Keyring unavailable, reading token from file: {:#}", e);
                    state.token.clone()
                }
            },
        };

        Ok(Self {
            path,
            state,
            vault,
            token,
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn vault(&self) -> TokenVault {
        self.vault
    }

    /// Stored bearer token, if any
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Stored bearer token, or `NotAuthenticated`
    pub fn require_token(&self) -> Result<String> {
        self.token()
            .map(str::to_string)
            .ok_or_else(|| SecquizError::NotAuthenticated.into())
    }

    /// Persist a new bearer token
    pub fn save_token(&mut self, token: &str) -> Result<()> {
        self.token = Some(token.to_string());
        self.state.token = match self.vault {
            TokenVault::File => Some(token.to_string()),
            TokenVault::Keyring => match save_keyring_token(token) {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!("Keyring unavailable, storing token in file: {:#}", e);
                    Some(token.to_string())
                }
            },
        };
        self.flush()
    }

    /// Forget the bearer token
    pub fn clear_token(&mut self) -> Result<()> {
        self.token = None;
        self.state.token = None;
        if self.vault == TokenVault::Keyring {
            if let Err(e) = clear_keyring_token() {
                tracing::warn!("Failed to clear token from keyring: {:#}", e);
            }
        }
        self.flush()
    }

    /// Last selected chat topic
    pub fn selected_topic(&self) -> Option<&str> {
        self.state.selected_topic.as_deref()
    }

    /// Remember the chat topic for the next session
    pub fn save_selected_topic(&mut self, topic: &str) -> Result<()> {
        self.state.selected_topic = Some(topic.to_string());
        self.flush()
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    SecquizError::Storage(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }
        let json = serde_json::to_string_pretty(&self.state)?;
        write_private(&self.path, json.as_bytes()).map_err(|e| {
            SecquizError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        tracing::debug!("Wrote local store {}", self.path.display());
        Ok(())
    }
}

fn read_state(path: &Path) -> Result<StoredState> {
    if !path.exists() {
        return Ok(StoredState::default());
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| SecquizError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
    match serde_json::from_str(&raw) {
        Ok(state) => Ok(state),
        Err(e) => {
            tracing::warn!("Ignoring unreadable local store {}: {}", path.display(), e);
            Ok(StoredState::default())
        }
    }
}

fn keyring_entry() -> Result<keyring::Entry> {
    Ok(keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?)
}

fn load_keyring_token() -> Result<Option<String>> {
    match keyring_entry()?.get_password() {
        Ok(token) if token.is_empty() => Ok(None),
        Ok(token) => Ok(Some(token)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(SecquizError::Keyring(e).into()),
    }
}

fn save_keyring_token(token: &str) -> Result<()> {
    keyring_entry()?.set_password(token)?;
    Ok(())
}

fn clear_keyring_token() -> Result<()> {
    match keyring_entry()?.delete_password() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(SecquizError::Keyring(e).into()),
    }
}

/// Write `contents` to `path` with owner-only permissions
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies when the file is created
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}
