//! Best-effort wrappers around the envelope codec.
//!
//! Credential read and write paths call these unconditionally. With no
//! secret configured both directions are passthrough. With a secret, any
//! codec failure is logged and the input is returned unchanged, so the
//! encryption layer never fails a request.

use tracing::warn;

use super::envelope;

/// Encrypt `plaintext` if a secret is configured.
///
/// Returns `plaintext` unchanged when `secret` is absent or blank, or when
/// encryption fails.
pub fn encrypt_maybe(plaintext: &str, secret: Option<&str>) -> String {
    let Some(secret) = secret.filter(|s| !s.trim().is_empty()) else {
        return plaintext.to_owned();
    };
    match envelope::encrypt(plaintext, secret) {
        Ok(sealed) => sealed,
        Err(e) => {
            warn!(error = %e, "credential encryption failed; storing value unencrypted");
            plaintext.to_owned()
        }
    }
}

/// Decrypt `stored` if a secret is configured.
///
/// Returns `stored` unchanged when `secret` is absent or blank, when the
/// value is not an envelope, or when decryption fails for any reason
/// (wrong key, tampering, malformed fields).
pub fn decrypt_maybe(stored: &str, secret: Option<&str>) -> String {
    let Some(secret) = secret.filter(|s| !s.trim().is_empty()) else {
        return stored.to_owned();
    };
    match envelope::decrypt(stored, secret) {
        Ok(plaintext) => plaintext,
        Err(e) => {
            warn!(error = %e, "credential decryption failed; returning stored value");
            stored.to_owned()
        }
    }
}
