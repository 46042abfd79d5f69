//! Credential store seam.
//!
//! The mobile shell owns secure storage (keychain/keystore); this crate only
//! consumes it as a get/set/delete key-value interface. An empty stored string
//! is treated as no credential at all.

use anyhow::Result;
use std::sync::Mutex;

/// Access to the provider credential held by the host app.
pub trait CredentialStore: Send + Sync {
    /// Current credential, if any. Implementations may return an empty
    /// string; callers treat that identically to `None`.
    fn get(&self) -> Option<String>;

    fn set(&self, credential: &str) -> Result<()>;

    fn delete(&self) -> Result<()>;
}

/// In-memory credential store, for tests and host shells without secure
/// storage wired up yet.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a credential.
    pub fn with_credential(credential: &str) -> Self {
        Self {
            inner: Mutex::new(Some(credential.to_string())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        self.inner.lock().ok()?.clone()
    }

    fn set(&self, credential: &str) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("credential store lock poisoned"))?;
        *guard = Some(credential.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("credential store lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}
