//! Configuration secret handling and data-key derivation.
//!
//! The configuration secret is an arbitrary-length string supplied once at
//! start-up. It is never used as key material directly: every encrypt or
//! decrypt call hashes it with SHA-256 into a fresh [`DerivedKey`], which is
//! zeroed when dropped. Nothing is cached between calls.

use std::fmt;

use serde::Deserialize;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// The process-wide encryption secret read from configuration.
///
/// Deserialises transparently from a plain string. The contents never appear
/// in `Debug` output and are zeroed on drop.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct ConfigSecret(String);

impl ConfigSecret {
    /// Wrap `secret`, returning `None` when it is empty or whitespace-only.
    ///
    /// A blank secret is the "no encryption configured" mode, not an error.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = Self(secret.into());
        (!secret.is_blank()).then_some(secret)
    }

    /// Returns `true` if the secret carries no usable material.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Borrow the raw secret for key derivation.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConfigSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConfigSecret([REDACTED])")
    }
}

/// A 256-bit symmetric key derived from a [`ConfigSecret`].
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    /// Get the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive the data key for `secret`: SHA-256 over its UTF-8 bytes.
///
/// Deterministic and infallible. An empty secret yields the digest of the
/// empty string; callers are expected not to reach the codec without a
/// configured secret.
pub fn derive_key(secret: &str) -> DerivedKey {
    let mut digest = Sha256::digest(secret.as_bytes());
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&digest);
    digest.as_mut_slice().zeroize();
    DerivedKey(key)
}
