//! Request and response types exchanged over the public HTTP API.
//!
//! All bodies are JSON. Stored credential values never appear in a response
//! except on the explicit credential-use route ([`CredentialResponse`]).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Third-party accounts
// ---------------------------------------------------------------------------

/// Request body for `POST /accounts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    /// Third-party platform the account belongs to (e.g. `"linkedin"`).
    pub platform: String,
    /// Login name on the third-party platform.
    pub username: String,
    /// Plaintext password; encrypted before it is persisted.
    pub password: String,
}

/// Request body for `PUT /accounts/:id/password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePasswordRequest {
    /// Replacement plaintext password.
    pub password: String,
}

/// Account summary returned by the create, get and list routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub platform: String,
    pub username: String,
    /// Whether the stored password is held as an encrypted envelope.
    pub password_encrypted: bool,
}

/// Response body for `GET /accounts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountListResponse {
    pub accounts: Vec<AccountResponse>,
}

/// Response body for `GET /accounts/:id/credential`.
///
/// `password` is the best-effort decryption of the stored value: when it
/// cannot be decrypted the raw stored string is returned instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialResponse {
    pub username: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: always `"ok"` once the server is listening.
    pub status: String,
    /// Whether an encryption secret is configured.
    pub encryption_enabled: bool,
    /// Number of third-party accounts currently stored.
    pub accounts: usize,
}
