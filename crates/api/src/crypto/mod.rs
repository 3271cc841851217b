//! Encryption of third-party credentials at rest.
//!
//! This module is intentionally free of HTTP and storage dependencies.
//!
//! - [`key`]: configuration secret wrapper and SHA-256 key derivation.
//! - [`envelope`]: strict AES-256-GCM codec for the `enc:v1:` text envelope.
//! - [`optional`]: best-effort wrappers that tolerate a missing secret and
//!   legacy or undecryptable stored values.
//!
//! # Envelope format
//!
//! ```text
//! enc:v1:<base64(nonce)>:<base64(tag)>:<base64(ciphertext)>
//! ```
//!
//! The `v1` token enables a future format without breaking existing
//! ciphertext; this build only decodes `v1` and treats anything else as
//! plaintext.

pub mod envelope;
pub mod key;
pub mod optional;

pub use envelope::is_envelope;
pub use key::ConfigSecret;
pub use optional::{decrypt_maybe, encrypt_maybe};
