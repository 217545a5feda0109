//! Process-scoped credential slot. The token lives only as long as the process
//! (the CLI analogue of browser session storage) and is never written to disk.
//! No expiry check happens here; staleness is the server's call.

use secrecy::SecretString;
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

/// Fixed key the bearer token is stored under.
pub const TOKEN_KEY: &str = "authToken";

/// A dumb slot for the raw bearer token.
pub trait CredentialStore: Send + Sync {
    fn store(&self, token: SecretString);
    fn retrieve(&self) -> Option<SecretString>;
    fn clear(&self);
}

/// In-memory store keyed by [`TOKEN_KEY`]. Clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    entries: Arc<RwLock<HashMap<&'static str, SecretString>>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a token handed in from outside the process.
    #[must_use]
    pub fn with_token(token: SecretString) -> Self {
        let store = Self::new();
        store.store(token);
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn store(&self, token: SecretString) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TOKEN_KEY, token);
    }

    fn retrieve(&self) -> Option<SecretString> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(TOKEN_KEY)
            .cloned()
    }

    fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(TOKEN_KEY);
    }
}
