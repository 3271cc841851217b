//! Persistence boundary for third-party account records.
//!
//! The relational layer of the full system is out of scope; handlers talk to
//! a [`CredentialStore`] that keeps string fields verbatim. The `password`
//! field holds whatever the write path produced (an `enc:v1:` envelope, or
//! plaintext when no secret is configured) and is never interpreted here.
//!
//! # Module invariants
//!
//! - **No crypto dependencies.** This module must not import anything from
//!   `crate::crypto`.
//! - Every lookup is scoped by owner: a record is invisible to any principal
//!   other than the one that created it.

pub mod memory;

pub use memory::MemoryStore;

use thiserror::Error;
use uuid::Uuid;

/// A stored third-party account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub id: Uuid,
    /// Principal id of the user who owns this account.
    pub owner: String,
    pub platform: String,
    pub username: String,
    /// Stored credential, kept verbatim.
    pub password: String,
}

/// Errors produced by the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this id already exists.
    #[error("account {0} already exists")]
    Duplicate(Uuid),
}

/// Key-value persistence for [`AccountRecord`]s.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if `record.id` is already present.
    fn insert(&self, record: AccountRecord) -> Result<(), StoreError>;

    /// Fetch one record owned by `owner`.
    fn get(&self, owner: &str, id: Uuid) -> Result<Option<AccountRecord>, StoreError>;

    /// All records owned by `owner`, ordered by platform then username.
    fn list(&self, owner: &str) -> Result<Vec<AccountRecord>, StoreError>;

    /// Replace the stored password. Returns `false` if no such record exists
    /// for `owner`.
    fn set_password(&self, owner: &str, id: Uuid, password: String)
        -> Result<bool, StoreError>;

    /// Delete a record. Returns `false` if no such record exists for `owner`.
    fn remove(&self, owner: &str, id: Uuid) -> Result<bool, StoreError>;

    /// Total number of records across all owners.
    fn count(&self) -> usize;
}
