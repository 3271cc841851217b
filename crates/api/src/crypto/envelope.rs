//! AES-256-GCM envelope codec for credential strings.
//!
//! An envelope is a five-field, colon-separated text value:
//!
//! ```text
//! enc:v1:<base64(nonce)>:<base64(tag)>:<base64(ciphertext)>
//! ```
//!
//! Base64 is the standard padded alphabet, which never contains `:`, so
//! splitting on the separator is unambiguous.
//!
//! Values that do not start with `enc:v1:`, or that do but split into a
//! field count other than five, are legacy plaintext and pass through
//! [`decrypt`] unchanged. Everything past that point fails closed: bad
//! base64, bad nonce or tag length, or a tag that does not verify is an
//! error, never garbage plaintext.

use aes_gcm::{
    aead::{rand_core::RngCore, AeadInPlace, KeyInit, OsRng},
    Aes256Gcm, Nonce, Tag,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use super::key::{derive_key, DerivedKey};

/// Magic token opening every envelope.
pub const MAGIC: &str = "enc";

/// Envelope format version handled by this codec.
pub const VERSION: &str = "v1";

/// Literal prefix (`magic:version:`) that marks a value as a v1 envelope.
pub const PREFIX: &str = "enc:v1:";

/// Field separator.
pub const SEPARATOR: char = ':';

/// Number of separator-delimited fields in a well-formed envelope.
pub const FIELD_COUNT: usize = 5;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of an AES-GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Errors produced by the envelope codec.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The derived key could not be loaded into the cipher.
    #[error("invalid key length")]
    InvalidKeyLength,

    /// AES-GCM encryption failed.
    #[error("aead encryption failed")]
    AeadFailure,

    /// The authentication tag did not verify: wrong key, or tampered or
    /// corrupted envelope.
    #[error("integrity check failed")]
    Integrity,

    /// The envelope carries the v1 prefix and five fields but one of them
    /// cannot be decoded.
    #[error("malformed envelope: invalid {field}")]
    Malformed {
        /// Which part of the envelope was rejected.
        field: &'static str,
    },
}

/// A decoded v1 envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw authentication tag bytes.
    pub tag: [u8; TAG_LEN],
    /// Raw ciphertext bytes, same length as the plaintext.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Encode this envelope to its canonical string representation.
    pub fn encode(&self) -> String {
        format!(
            "{MAGIC}{SEPARATOR}{VERSION}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            STANDARD.encode(self.nonce),
            STANDARD.encode(self.tag),
            STANDARD.encode(&self.ciphertext),
        )
    }

    /// Parse a stored value.
    ///
    /// Returns `Ok(None)` for anything that is not shaped like a v1 envelope
    /// (wrong prefix or wrong field count); such values are plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Malformed`] if a field of a v1-shaped value is
    /// not valid base64 or has the wrong decoded length.
    pub fn parse(value: &str) -> Result<Option<Self>, CipherError> {
        if !value.starts_with(PREFIX) {
            return Ok(None);
        }
        let fields: Vec<&str> = value.split(SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Ok(None);
        }

        let nonce = decode_fixed::<NONCE_LEN>(fields[2], "nonce")?;
        let tag = decode_fixed::<TAG_LEN>(fields[3], "tag")?;
        let ciphertext = STANDARD
            .decode(fields[4])
            .map_err(|_| CipherError::Malformed { field: "ciphertext" })?;

        Ok(Some(Self {
            nonce,
            tag,
            ciphertext,
        }))
    }
}

fn decode_fixed<const N: usize>(
    field: &str,
    name: &'static str,
) -> Result<[u8; N], CipherError> {
    let bytes = STANDARD
        .decode(field)
        .map_err(|_| CipherError::Malformed { field: name })?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| CipherError::Malformed { field: name })
}

/// Returns `true` if `value` is shaped like a v1 envelope (prefix and five
/// fields). Does not decode or authenticate anything.
pub fn is_envelope(value: &str) -> bool {
    value.starts_with(PREFIX) && value.split(SEPARATOR).count() == FIELD_COUNT
}

/// Encrypt `plaintext` under the key derived from `secret`.
///
/// A fresh random 96-bit nonce is drawn from the OS CSPRNG on every call, so
/// two encryptions of the same plaintext never produce the same envelope.
///
/// # Errors
///
/// Returns [`CipherError::AeadFailure`] on an internal AEAD error (should be
/// unreachable with a valid key and nonce).
pub fn encrypt(plaintext: &str, secret: &str) -> Result<String, CipherError> {
    let key = derive_key(secret);
    let cipher = build_cipher(&key)?;

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let mut ciphertext = plaintext.as_bytes().to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut ciphertext)
        .map_err(|_| CipherError::AeadFailure)?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);

    Ok(Envelope {
        nonce,
        tag: tag_bytes,
        ciphertext,
    }
    .encode())
}

/// Decrypt a stored value under the key derived from `secret`.
///
/// Values that are not v1 envelopes are returned unchanged.
///
/// # Errors
///
/// Returns [`CipherError::Malformed`] if a v1 envelope cannot be decoded and
/// [`CipherError::Integrity`] if its tag does not verify.
pub fn decrypt(value: &str, secret: &str) -> Result<String, CipherError> {
    let Some(envelope) = Envelope::parse(value)? else {
        return Ok(value.to_owned());
    };

    let key = derive_key(secret);
    let cipher = build_cipher(&key)?;

    let mut plaintext = envelope.ciphertext;
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(&envelope.nonce),
            b"",
            &mut plaintext,
            Tag::from_slice(&envelope.tag),
        )
        .map_err(|_| CipherError::Integrity)?;

    String::from_utf8(plaintext).map_err(|_| CipherError::Malformed { field: "plaintext" })
}

fn build_cipher(key: &DerivedKey) -> Result<Aes256Gcm, CipherError> {
    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CipherError::InvalidKeyLength)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes_gcm::aead::Aead;

    /// Re-encode `envelope` with one bit of the decoded `field` flipped.
    fn flip(envelope: &str, field: usize, byte: usize) -> String {
        let mut fields: Vec<String> = envelope.split(SEPARATOR).map(str::to_owned).collect();
        let mut raw = STANDARD.decode(&fields[field]).unwrap();
        raw[byte] ^= 0x01;
        fields[field] = STANDARD.encode(&raw);
        fields.join(":")
    }

    #[test]
    fn round_trip() {
        let long = "x".repeat(4096);
        for plaintext in [
            "hunter2",
            "",
            "pa:ss:wo:rd",
            "enc:v1:looks:like:an:envelope",
            "mot de passe — ключ — 密码 — 🔐",
            long.as_str(),
        ] {
            let envelope = encrypt(plaintext, "k1").unwrap();
            assert_eq!(decrypt(&envelope, "k1").unwrap(), plaintext);
        }
    }

    #[test]
    fn prefix_is_magic_and_version() {
        assert_eq!(PREFIX, format!("{MAGIC}{SEPARATOR}{VERSION}{SEPARATOR}"));
    }

    #[test]
    fn envelope_shape() {
        let envelope = encrypt("hunter2", "k1").unwrap();
        assert!(envelope.starts_with(PREFIX));

        let fields: Vec<&str> = envelope.split(SEPARATOR).collect();
        assert_eq!(fields.len(), FIELD_COUNT);
        assert_eq!(fields[0], MAGIC);
        assert_eq!(fields[1], VERSION);
        assert_eq!(STANDARD.decode(fields[2]).unwrap().len(), NONCE_LEN);
        assert_eq!(STANDARD.decode(fields[3]).unwrap().len(), TAG_LEN);
        assert_eq!(STANDARD.decode(fields[4]).unwrap().len(), "hunter2".len());
        assert!(is_envelope(&envelope));
    }

    #[test]
    fn empty_plaintext_has_empty_ciphertext_field() {
        let envelope = encrypt("", "k1").unwrap();
        assert!(envelope.ends_with(SEPARATOR));
        assert_eq!(envelope.split(SEPARATOR).count(), FIELD_COUNT);
    }

    #[test]
    fn same_plaintext_different_envelopes() {
        let a = encrypt("hunter2", "k1").unwrap();
        let b = encrypt("hunter2", "k1").unwrap();
        assert_ne!(a, b);
        assert_ne!(
            Envelope::parse(&a).unwrap().unwrap().nonce,
            Envelope::parse(&b).unwrap().unwrap().nonce
        );
    }

    #[test]
    fn wrong_key_fails_integrity() {
        let envelope = encrypt("hunter2", "k1").unwrap();
        assert!(matches!(
            decrypt(&envelope, "k2"),
            Err(CipherError::Integrity)
        ));
    }

    #[test]
    fn any_flipped_tag_or_ciphertext_byte_fails_integrity() {
        let envelope = encrypt("hunter2", "k1").unwrap();
        for byte in 0..TAG_LEN {
            let tampered = flip(&envelope, 3, byte);
            assert!(matches!(
                decrypt(&tampered, "k1"),
                Err(CipherError::Integrity)
            ));
        }
        for byte in 0.."hunter2".len() {
            let tampered = flip(&envelope, 4, byte);
            assert!(matches!(
                decrypt(&tampered, "k1"),
                Err(CipherError::Integrity)
            ));
        }
    }

    #[test]
    fn flipped_nonce_fails_integrity() {
        let envelope = encrypt("hunter2", "k1").unwrap();
        let tampered = flip(&envelope, 2, 0);
        assert!(matches!(
            decrypt(&tampered, "k1"),
            Err(CipherError::Integrity)
        ));
    }

    #[test]
    fn plaintext_passes_through() {
        for value in ["plainOldPassword", "", "enc", "enc:v1", "v1:enc:a:b:c", "ENC:V1:a:b:c"] {
            assert_eq!(decrypt(value, "k1").unwrap(), value);
            assert_eq!(decrypt(value, "").unwrap(), value);
        }
    }

    #[test]
    fn other_version_passes_through() {
        let v2 = encrypt("hunter2", "k1").unwrap().replacen("enc:v1:", "enc:v2:", 1);
        assert_eq!(decrypt(&v2, "k1").unwrap(), v2);
    }

    #[test]
    fn wrong_field_count_passes_through() {
        let envelope = encrypt("hunter2", "k1").unwrap();
        let four = envelope.rsplitn(2, SEPARATOR).nth(1).unwrap().to_owned();
        let six = format!("{envelope}:extra");
        assert_eq!(decrypt(&four, "k1").unwrap(), four);
        assert_eq!(decrypt(&six, "k1").unwrap(), six);
        assert_eq!(decrypt("enc:v1:", "k1").unwrap(), "enc:v1:");
        assert!(!is_envelope(&four));
        assert!(!is_envelope(&six));
    }

    #[test]
    fn bad_base64_is_malformed() {
        let err = decrypt("enc:v1:!!!:AAAAAAAAAAAAAAAAAAAAAA==:AA==", "k1").unwrap_err();
        assert!(matches!(err, CipherError::Malformed { field: "nonce" }));
    }

    #[test]
    fn wrong_nonce_length_is_malformed() {
        let envelope = encrypt("hunter2", "k1").unwrap();
        let mut fields: Vec<String> = envelope.split(SEPARATOR).map(str::to_owned).collect();
        fields[2] = STANDARD.encode([0u8; 8]);
        let err = decrypt(&fields.join(":"), "k1").unwrap_err();
        assert!(matches!(err, CipherError::Malformed { field: "nonce" }));
    }

    #[test]
    fn wrong_tag_length_is_malformed() {
        let envelope = encrypt("hunter2", "k1").unwrap();
        let mut fields: Vec<String> = envelope.split(SEPARATOR).map(str::to_owned).collect();
        fields[3] = STANDARD.encode([0u8; 12]);
        let err = decrypt(&fields.join(":"), "k1").unwrap_err();
        assert!(matches!(err, CipherError::Malformed { field: "tag" }));
    }

    #[test]
    fn decrypts_envelope_built_from_combined_aead_output() {
        // Most AES-GCM APIs return ciphertext || tag; the envelope stores the
        // two halves separately.
        let key = derive_key("k1");
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).unwrap();
        let nonce = [7u8; NONCE_LEN];
        let combined = cipher
            .encrypt(Nonce::from_slice(&nonce), "hunter2".as_bytes())
            .unwrap();
        let (ciphertext, tag) = combined.split_at(combined.len() - TAG_LEN);

        let envelope = format!(
            "enc:v1:{}:{}:{}",
            STANDARD.encode(nonce),
            STANDARD.encode(tag),
            STANDARD.encode(ciphertext)
        );
        assert_eq!(decrypt(&envelope, "k1").unwrap(), "hunter2");
    }

    #[test]
    fn parse_and_encode_agree() {
        let envelope = encrypt("hunter2", "k1").unwrap();
        let parsed = Envelope::parse(&envelope).unwrap().unwrap();
        assert_eq!(parsed.encode(), envelope);
        assert!(Envelope::parse("plainOldPassword").unwrap().is_none());
    }
}
