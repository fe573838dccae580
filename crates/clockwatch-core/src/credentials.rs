//! Credential storage for the single Clockify API key.
//!
//! Production builds keep the key in the OS keyring. The store owns the
//! credential exclusively: it is only ever changed by explicit save/clear
//! calls, and a write failure propagates to the caller unchanged.

use std::sync::Mutex;

use crate::error::CredentialError;

const SERVICE: &str = "clockwatch";
const ENTRY: &str = "api_key";

/// Persists one opaque API key string.
pub trait CredentialStore: Send + Sync {
    fn save(&self, key: &str) -> Result<(), CredentialError>;
    fn get(&self) -> Result<Option<String>, CredentialError>;
    fn clear(&self) -> Result<(), CredentialError>;
}

/// OS-keyring-backed store.
pub struct KeyringStore;

impl CredentialStore for KeyringStore {
    fn save(&self, key: &str) -> Result<(), CredentialError> {
        let entry = keyring::Entry::new(SERVICE, ENTRY)?;
        entry.set_password(key)?;
        Ok(())
    }

    fn get(&self) -> Result<Option<String>, CredentialError> {
        let entry = keyring::Entry::new(SERVICE, ENTRY)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let entry = keyring::Entry::new(SERVICE, ENTRY)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and headless environments without a keyring.
#[derive(Default)]
pub struct MemoryStore(Mutex<Option<String>>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn save(&self, key: &str) -> Result<(), CredentialError> {
        let mut slot = self
            .0
            .lock()
            .map_err(|e| CredentialError::Backend(e.to_string()))?;
        *slot = Some(key.to_string());
        Ok(())
    }

    fn get(&self) -> Result<Option<String>, CredentialError> {
        let slot = self
            .0
            .lock()
            .map_err(|e| CredentialError::Backend(e.to_string()))?;
        Ok(slot.clone())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let mut slot = self
            .0
            .lock()
            .map_err(|e| CredentialError::Backend(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}

impl<S: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<S> {
    fn save(&self, key: &str) -> Result<(), CredentialError> {
        (**self).save(key)
    }

    fn get(&self) -> Result<Option<String>, CredentialError> {
        (**self).get()
    }

    fn clear(&self) -> Result<(), CredentialError> {
        (**self).clear()
    }
}
