//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::crypto::ConfigSecret;
use crate::store::{CredentialStore, MemoryStore};

/// Application state shared across all request handlers.
///
/// All fields are `Arc`-wrapped so that Axum can clone the state for each
/// request without copying the store or the secret.
#[derive(Clone)]
pub struct AppState {
    /// Persistence for third-party account records.
    pub store: Arc<dyn CredentialStore>,
    /// Encryption secret; `None` means credentials are stored unencrypted.
    pub secret: Option<Arc<ConfigSecret>>,
    /// Name of the HTTP header carrying the authenticated principal id.
    pub principal_header_name: Arc<String>,
}

impl AppState {
    /// Create a new [`AppState`].
    pub fn new(
        store: Arc<dyn CredentialStore>,
        secret: Option<ConfigSecret>,
        principal_header_name: String,
    ) -> Self {
        Self {
            store,
            secret: secret.map(Arc::new),
            principal_header_name: Arc::new(principal_header_name),
        }
    }

    /// Borrow the secret for a single encrypt or decrypt call.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref().map(ConfigSecret::expose)
    }
}

impl Default for AppState {
    /// Creates an [`AppState`] with an empty in-memory store and no secret,
    /// suitable for tests.
    fn default() -> Self {
        Self::new(Arc::new(MemoryStore::new()), None, "X-User-Id".into())
    }
}
