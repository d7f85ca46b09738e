use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::Result;

/// The identity markers that survive a restart.
///
/// All four scalars are written together on login and cleared together on
/// logout. Serializing them as one record makes a partial write or partial
/// clear unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredIdentity {
    /// The bearer token, possibly empty when the backend did not issue one.
    pub token: String,
    /// The authenticated user's id.
    pub user_id: i64,
    /// The authenticated user's username.
    pub username: String,
    /// The authenticated user's role.
    pub role: String,
}

impl StoredIdentity {
    /// Whether the markers are sufficient to restore a session: a
    /// non-empty token and a positive user id.
    pub fn is_restorable(&self) -> bool {
        !self.token.is_empty() && self.user_id > 0
    }
}

/// Persistence for the identity markers.
///
/// Implementations must store and clear the whole record in one step so a
/// concurrent reader never observes a half-written identity.
pub trait CredentialStore: Send + Sync {
    /// Returns the persisted identity, if any.
    fn load(&self) -> Option<StoredIdentity>;

    /// Replaces the persisted identity.
    fn store(&self, identity: &StoredIdentity) -> Result<()>;

    /// Removes the persisted identity.
    fn clear(&self) -> Result<()>;

    /// Returns the bearer token, if one is persisted and non-empty.
    fn token(&self) -> Option<String> {
        self.load()
            .map(|identity| identity.token)
            .filter(|token| !token.is_empty())
    }
}

/// A `CredentialStore` backed by a single JSON file.
pub struct FileCredentials {
    path: PathBuf,
    cached: Mutex<Option<StoredIdentity>>,
}

impl FileCredentials {
    /// Opens the store at `path`, reading any identity persisted by a
    /// previous run. A missing file means no stored identity; an
    /// unreadable one is treated the same and logged.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let cached = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    tracing::warn!("Discarding unreadable credential file: {}", e);
                    None
                }
            },
            Err(_) => None,
        };
        Self {
            path,
            cached: Mutex::new(cached),
        }
    }
}

impl CredentialStore for FileCredentials {
    fn load(&self) -> Option<StoredIdentity> {
        self.cached.lock().unwrap().clone()
    }

    fn store(&self, identity: &StoredIdentity) -> Result<()> {
        let mut cached = self.cached.lock().unwrap();
        let raw = serde_json::to_string_pretty(identity)?;
        std::fs::write(&self.path, raw)?;
        *cached = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut cached = self.cached.lock().unwrap();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        *cached = None;
        Ok(())
    }
}

/// An in-memory `CredentialStore` for tests and embedders that bring
/// their own persistence.
#[derive(Default)]
pub struct MemoryCredentials {
    inner: Mutex<Option<StoredIdentity>>,
}

impl MemoryCredentials {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentials {
    fn load(&self) -> Option<StoredIdentity> {
        self.inner.lock().unwrap().clone()
    }

    fn store(&self, identity: &StoredIdentity) -> Result<()> {
        *self.inner.lock().unwrap() = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.inner.lock().unwrap() = None;
        Ok(())
    }
}
