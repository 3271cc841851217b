//! [`MemoryStore`]: in-process [`CredentialStore`] backed by a locked map.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use super::{AccountRecord, CredentialStore, StoreError};

/// Thread-safe in-memory account store.
///
/// Wraps an `Arc<RwLock<HashMap<..>>>` so that clones share the same data
/// and concurrent readers do not contend. Locks are never held across an
/// `.await`.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<Uuid, AccountRecord>>>,
}

impl MemoryStore {
    /// Create a new, empty [`MemoryStore`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn insert(&self, record: AccountRecord) -> Result<(), StoreError> {
        let mut map = self.inner.write();
        if map.contains_key(&record.id) {
            return Err(StoreError::Duplicate(record.id));
        }
        map.insert(record.id, record);
        Ok(())
    }

    fn get(&self, owner: &str, id: Uuid) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self
            .inner
            .read()
            .get(&id)
            .filter(|r| r.owner == owner)
            .cloned())
    }

    fn list(&self, owner: &str) -> Result<Vec<AccountRecord>, StoreError> {
        let mut records: Vec<AccountRecord> = self
            .inner
            .read()
            .values()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            (a.platform.as_str(), a.username.as_str())
                .cmp(&(b.platform.as_str(), b.username.as_str()))
        });
        Ok(records)
    }

    fn set_password(
        &self,
        owner: &str,
        id: Uuid,
        password: String,
    ) -> Result<bool, StoreError> {
        match self.inner.write().get_mut(&id) {
            Some(record) if record.owner == owner => {
                record.password = password;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn remove(&self, owner: &str, id: Uuid) -> Result<bool, StoreError> {
        let mut map = self.inner.write();
        if map.get(&id).is_some_and(|r| r.owner == owner) {
            map.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    fn count(&self) -> usize {
        self.inner.read().len()
    }
}
