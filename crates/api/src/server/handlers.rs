//! Axum request handlers for all service endpoints.
//!
//! Credential write paths pass the plaintext through
//! [`encrypt_maybe`](crate::crypto::encrypt_maybe) before it reaches the
//! store; the credential-use path passes the stored value through
//! [`decrypt_maybe`](crate::crypto::decrypt_maybe). Neither can fail, so
//! errors here come only from validation and storage.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    AccountListResponse, AccountResponse, CreateAccountRequest, CredentialResponse,
    ErrorResponse, HealthResponse, UpdatePasswordRequest,
};
use common::ServiceError;
use tracing::{error, info};
use uuid::Uuid;

use super::auth::Principal;
use super::extract::{AccountId, JsonBody};
use super::state::AppState;
use crate::crypto::{decrypt_maybe, encrypt_maybe, is_envelope};
use crate::store::{AccountRecord, StoreError};

/// Render a [`ServiceError`] as a JSON error response.
pub(crate) fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

fn storage_failure(err: StoreError) -> ServiceError {
    error!(error = %err, "account store operation failed");
    ServiceError::Internal("account storage failed".into())
}

fn account_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("account {id}"))
}

fn summary(record: &AccountRecord) -> AccountResponse {
    AccountResponse {
        id: record.id,
        platform: record.platform.clone(),
        username: record.username.clone(),
        password_encrypted: is_envelope(&record.password),
    }
}

fn require_non_blank(value: &str, field: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::BadRequest(format!("{field} must not be blank")));
    }
    Ok(())
}

fn respond<T: IntoResponse>(result: Result<T, ServiceError>) -> Response {
    match result {
        Ok(body) => body.into_response(),
        Err(e) => error_response(&e),
    }
}

fn find_account(state: &AppState, owner: &str, id: Uuid) -> Result<AccountRecord, ServiceError> {
    state
        .store
        .get(owner, id)
        .map_err(storage_failure)?
        .ok_or_else(|| account_not_found(id))
}

/// `GET /health` — liveness check.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        encryption_enabled: state.secret.is_some(),
        accounts: state.store.count(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// `POST /accounts` — store a third-party account with its password
/// encrypted at rest.
pub async fn create_account(
    State(state): State<AppState>,
    Principal(owner): Principal,
    JsonBody(req): JsonBody<CreateAccountRequest>,
) -> Response {
    respond(
        insert_account(&state, owner, req).map(|body| (StatusCode::CREATED, Json(body))),
    )
}

fn insert_account(
    state: &AppState,
    owner: String,
    req: CreateAccountRequest,
) -> Result<AccountResponse, ServiceError> {
    require_non_blank(&req.platform, "platform")?;
    require_non_blank(&req.username, "username")?;

    let record = AccountRecord {
        id: Uuid::new_v4(),
        owner,
        platform: req.platform.trim().to_owned(),
        username: req.username.trim().to_owned(),
        password: encrypt_maybe(&req.password, state.secret()),
    };
    let body = summary(&record);
    state.store.insert(record).map_err(storage_failure)?;

    info!(
        account_id = %body.id,
        platform = %body.platform,
        encrypted = body.password_encrypted,
        "account created"
    );
    Ok(body)
}

/// `GET /accounts` — list the caller's accounts without credentials.
pub async fn list_accounts(
    State(state): State<AppState>,
    Principal(owner): Principal,
) -> Response {
    respond(
        state
            .store
            .list(&owner)
            .map(|records| {
                Json(AccountListResponse {
                    accounts: records.iter().map(summary).collect(),
                })
            })
            .map_err(storage_failure),
    )
}

/// `GET /accounts/:id` — one account summary.
pub async fn get_account(
    State(state): State<AppState>,
    Principal(owner): Principal,
    AccountId(id): AccountId,
) -> Response {
    respond(find_account(&state, &owner, id).map(|record| Json(summary(&record))))
}

/// `PUT /accounts/:id/password` — replace the stored password.
pub async fn update_password(
    State(state): State<AppState>,
    Principal(owner): Principal,
    AccountId(id): AccountId,
    JsonBody(req): JsonBody<UpdatePasswordRequest>,
) -> Response {
    let stored = encrypt_maybe(&req.password, state.secret());
    respond(match state.store.set_password(&owner, id, stored) {
        Ok(true) => {
            info!(account_id = %id, "account password updated");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(account_not_found(id)),
        Err(e) => Err(storage_failure(e)),
    })
}

/// `GET /accounts/:id/credential` — the credential as needed to log in to
/// the third-party platform.
///
/// The password is decrypted best-effort: if it cannot be decrypted the raw
/// stored value is returned rather than an error.
pub async fn get_credential(
    State(state): State<AppState>,
    Principal(owner): Principal,
    AccountId(id): AccountId,
) -> Response {
    respond(find_account(&state, &owner, id).map(|record| {
        Json(CredentialResponse {
            password: decrypt_maybe(&record.password, state.secret()),
            username: record.username,
        })
    }))
}

/// `DELETE /accounts/:id` — remove an account and its stored credential.
pub async fn delete_account(
    State(state): State<AppState>,
    Principal(owner): Principal,
    AccountId(id): AccountId,
) -> Response {
    respond(match state.store.remove(&owner, id) {
        Ok(true) => {
            info!(account_id = %id, "account deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(account_not_found(id)),
        Err(e) => Err(storage_failure(e)),
    })
}

/// `POST /accounts/:id/messages` — send a message through the account's
/// platform. Not implemented; answers 501 once the account is resolved.
pub async fn send_message(
    State(state): State<AppState>,
    Principal(owner): Principal,
    AccountId(id): AccountId,
) -> Response {
    let result = find_account(&state, &owner, id).and_then(|record| {
        Err(ServiceError::NotImplemented(format!(
            "sending messages via {} is not supported",
            record.platform
        )))
    });
    respond::<StatusCode>(result)
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::crypto::envelope::PREFIX;
    use crate::crypto::ConfigSecret;
    use crate::store::MockCredentialStore;

    fn record(password: &str) -> AccountRecord {
        AccountRecord {
            id: Uuid::new_v4(),
            owner: "alice".into(),
            platform: "linkedin".into(),
            username: "a@example.com".into(),
            password: password.into(),
        }
    }

    fn state_with(store: MockCredentialStore, secret: Option<&str>) -> AppState {
        AppState::new(
            Arc::new(store),
            secret.and_then(ConfigSecret::new),
            "X-User-Id".into(),
        )
    }

    #[test]
    fn error_response_uses_service_status() {
        let resp = error_response(&ServiceError::NotImplemented("x".into()));
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn summary_reports_encryption() {
        assert!(!summary(&record("plainOldPassword")).password_encrypted);
        let sealed = encrypt_maybe("hunter2", Some("k1"));
        assert!(summary(&record(&sealed)).password_encrypted);
    }

    #[tokio::test]
    async fn create_stores_envelope_when_secret_configured() {
        let mut store = MockCredentialStore::new();
        store
            .expect_insert()
            .withf(|r| r.password.starts_with(PREFIX) && r.owner == "alice")
            .times(1)
            .returning(|_| Ok(()));
        let state = state_with(store, Some("k1"));

        let resp = create_account(
            State(state),
            Principal("alice".into()),
            JsonBody(CreateAccountRequest {
                platform: "linkedin".into(),
                username: "a@example.com".into(),
                password: "hunter2".into(),
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn create_stores_plaintext_without_secret() {
        let mut store = MockCredentialStore::new();
        store
            .expect_insert()
            .withf(|r| r.password == "hunter2")
            .times(1)
            .returning(|_| Ok(()));
        let state = state_with(store, None);

        let resp = create_account(
            State(state),
            Principal("alice".into()),
            JsonBody(CreateAccountRequest {
                platform: "linkedin".into(),
                username: "a@example.com".into(),
                password: "hunter2".into(),
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn create_rejects_blank_platform_without_touching_store() {
        let mut store = MockCredentialStore::new();
        store.expect_insert().never();
        let state = state_with(store, Some("k1"));

        let resp = create_account(
            State(state),
            Principal("alice".into()),
            JsonBody(CreateAccountRequest {
                platform: " ".into(),
                username: "a@example.com".into(),
                password: "hunter2".into(),
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn store_failure_is_internal_error() {
        let mut store = MockCredentialStore::new();
        store
            .expect_insert()
            .returning(|r| Err(StoreError::Duplicate(r.id)));
        let state = state_with(store, Some("k1"));

        let resp = create_account(
            State(state),
            Principal("alice".into()),
            JsonBody(CreateAccountRequest {
                platform: "linkedin".into(),
                username: "a@example.com".into(),
                password: "hunter2".into(),
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn credential_with_wrong_key_returns_stored_value() {
        let sealed = encrypt_maybe("hunter2", Some("k1"));
        let rec = record(&sealed);
        let id = rec.id;
        let mut store = MockCredentialStore::new();
        store
            .expect_get()
            .returning(move |_, _| Ok(Some(rec.clone())));
        let state = state_with(store, Some("k2"));

        let resp = get_credential(State(state), Principal("alice".into()), AccountId(id)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: CredentialResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.password, sealed);
    }

    #[tokio::test]
    async fn send_message_is_not_implemented() {
        let rec = record("hunter2");
        let id = rec.id;
        let mut store = MockCredentialStore::new();
        store
            .expect_get()
            .returning(move |_, _| Ok(Some(rec.clone())));
        let state = state_with(store, None);

        let resp = send_message(State(state), Principal("alice".into()), AccountId(id)).await;
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn send_message_to_unknown_account_is_not_found() {
        let mut store = MockCredentialStore::new();
        store.expect_get().returning(|_, _| Ok(None));
        let state = state_with(store, None);

        let resp =
            send_message(State(state), Principal("alice".into()), AccountId(Uuid::new_v4())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
