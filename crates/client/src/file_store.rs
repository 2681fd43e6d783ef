//! Persistent credential store backed by a small JSON file.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use eventhub_auth::{Credential, CredentialStore, StoreError};

#[derive(Debug, Serialize, Deserialize)]
struct StoredCredential {
    token: Credential,
}

/// Credential store persisted at a fixed path.
///
/// A missing file means "signed out". Writes go through a sibling temp file
/// and a rename so a crash never leaves a half-written token behind.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<Credential>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredCredential =
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(format!("{}: {e}", self.path.display())))?;
        Ok(Some(stored.token))
    }

    fn set(&self, credential: Credential) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let body = serde_json::to_vec(&StoredCredential { token: credential })
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let tmp = self.temp_path();
        write_private(&tmp, &body)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), "credential persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "credential removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write `body` to a fresh file readable by the owner only (0600 on unix).
fn write_private(path: &Path, body: &[u8]) -> std::io::Result<()> {
    // A leftover temp file would keep its old mode; start from scratch.
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(body)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credential.json"));
        assert!(store.get().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn set_creates_parent_dirs_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("eventhub").join("credential.json");
        let store = FileCredentialStore::new(&path);

        store.set(Credential::new("h.p.s")).unwrap();
        assert!(path.exists());
        assert!(!store.temp_path().exists());

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.get().unwrap(), Some(Credential::new("h.p.s")));

        reopened.clear().unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn credential_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credential.json");
        let store = FileCredentialStore::new(&path);

        // A stale world-readable temp file must not leak its mode.
        std::fs::write(store.temp_path(), "stale").unwrap();
        std::fs::set_permissions(store.temp_path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        store.set(Credential::new("h.p.s")).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.get().unwrap(), Some(Credential::new("h.p.s")));
    }

    #[test]
    fn unparseable_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credential.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileCredentialStore::new(&path).get().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
