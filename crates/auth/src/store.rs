use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::Credential;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential store is corrupt: {0}")]
    Corrupt(String),

    #[error("credential store lock poisoned")]
    Poisoned,
}

/// Holder of the current bearer credential.
///
/// One instance is shared process-wide; `get` must reflect the most recent
/// `set`/`clear`. Methods take `&self` so the store can sit behind `Arc`.
pub trait CredentialStore {
    fn get(&self) -> Result<Option<Credential>, StoreError>;

    fn set(&self, credential: Credential) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for &S {
    fn get(&self) -> Result<Option<Credential>, StoreError> {
        (**self).get()
    }

    fn set(&self, credential: Credential) -> Result<(), StoreError> {
        (**self).set(credential)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    fn get(&self) -> Result<Option<Credential>, StoreError> {
        (**self).get()
    }

    fn set(&self, credential: Credential) -> Result<(), StoreError> {
        (**self).set(credential)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// In-memory credential store.
///
/// Intended for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    current: RwLock<Option<Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            current: RwLock::new(Some(credential)),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self) -> Result<Option<Credential>, StoreError> {
        let guard = self.current.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.clone())
    }

    fn set(&self, credential: Credential) -> Result<(), StoreError> {
        let mut guard = self.current.write().map_err(|_| StoreError::Poisoned)?;
        *guard = Some(credential);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.current.write().map_err(|_| StoreError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_reflects_latest_write() {
        let store = InMemoryCredentialStore::new();
        assert!(store.get().unwrap().is_none());

        store.set(Credential::new("a.b.c")).unwrap();
        store.set(Credential::new("d.e.f")).unwrap();
        assert_eq!(store.get().unwrap(), Some(Credential::new("d.e.f")));

        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn shared_handles_see_the_same_state() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let other = Arc::clone(&store);

        store.set(Credential::new("x.y.z")).unwrap();
        assert_eq!(other.get().unwrap(), Some(Credential::new("x.y.z")));

        other.clear().unwrap();
        assert!(store.get().unwrap().is_none());
    }
}
