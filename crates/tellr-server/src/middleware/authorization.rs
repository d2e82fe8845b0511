//! Account ownership checks for `/account/{id}` routes.

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::TRACING_TARGET_AUTHORIZATION;
use crate::extract::TokenHeader;
use crate::handler::ErrorKind;
use crate::service::{AccountStore, SessionKeys, StoreError, TokenError};

/// Why [`require_account_owner`] refused a request.
///
/// Only [`AuthError::Storage`] is distinguishable by the client (500); every
/// other reason is reported as the same 403.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The `x-jwt-token` header is absent, empty or not ASCII.
    #[error("missing token")]
    MissingToken,
    /// The token could not be parsed or verified.
    #[error(transparent)]
    Token(#[from] TokenError),
    /// The token verified but has expired.
    #[error("token expired")]
    TokenInvalid,
    /// The `{id}` path segment is not an account identifier.
    #[error("invalid account id")]
    InvalidAccountId,
    /// No live account has the requested identifier.
    #[error("account not found")]
    AccountNotFound,
    /// The token belongs to a different account.
    #[error("account number mismatch")]
    AccountMismatch,
    /// The account lookup failed.
    #[error("account lookup failed: {0}")]
    Storage(#[source] StoreError),
}

impl AuthError {
    /// Short machine-readable reason, for logs only.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::Token(TokenError::MalformedToken) => "malformed_token",
            Self::Token(TokenError::InvalidSignature) => "invalid_signature",
            Self::Token(TokenError::ClaimTypeMismatch(_)) => "claim_type_mismatch",
            Self::TokenInvalid => "token_invalid",
            Self::InvalidAccountId => "invalid_account_id",
            Self::AccountNotFound => "account_not_found",
            Self::AccountMismatch => "account_mismatch",
            Self::Storage(_) => "storage_error",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::AccountNotFound,
            error => Self::Storage(error),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::Storage(error) => ErrorKind::InternalServerError
                .with_context(error.to_string())
                .into_response(),
            _ => ErrorKind::Forbidden.into_response(),
        }
    }
}

/// Lets the request through only if its token belongs to account `{id}`.
///
/// Layer with [`from_fn_with_state`] via `route_layer`, so the path
/// parameter is already matched:
///
/// 1. The `x-jwt-token` header must hold a token that verifies and has not
///    expired.
/// 2. `{id}` must name a live account.
/// 3. The token's account number must equal that account's number.
///
/// The wrapped handler runs at most once, with the request untouched.
///
/// [`from_fn_with_state`]: axum::middleware::from_fn_with_state
pub async fn require_account_owner(
    State(session_keys): State<SessionKeys>,
    State(accounts): State<Arc<dyn AccountStore>>,
    account_id: Result<Path<i64>, PathRejection>,
    request: Request,
    next: Next,
) -> Response {
    let token = TokenHeader::from_headers(request.headers());
    match authorize(&session_keys, accounts.as_ref(), token, account_id).await {
        Ok(()) => next.run(request).await,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET_AUTHORIZATION,
                method = %request.method(),
                uri = %request.uri(),
                reason = error.reason(),
                error = %error,
                "access denied"
            );

            error.into_response()
        }
    }
}

async fn authorize(
    session_keys: &SessionKeys,
    accounts: &dyn AccountStore,
    token: Option<TokenHeader>,
    account_id: Result<Path<i64>, PathRejection>,
) -> Result<(), AuthError> {
    let token = token.ok_or(AuthError::MissingToken)?;
    let parsed_token = session_keys.validate_token(token.as_str())?;
    if !parsed_token.is_valid() {
        return Err(AuthError::TokenInvalid);
    }

    let Path(account_id) = account_id.map_err(|_| AuthError::InvalidAccountId)?;
    let account = accounts.find_account_by_id(account_id).await?;

    if parsed_token.claims().account_number != account.number {
        return Err(AuthError::AccountMismatch);
    }

    tracing::debug!(
        target: TRACING_TARGET_AUTHORIZATION,
        account_id,
        "account owner verified"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum_test::TestServer;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use jiff::Timestamp;
    use serde_json::json;
    use tellr_postgres::model::{Account, NewAccount};

    use super::*;
    use crate::extract::AUTH_TOKEN_HEADER;
    use crate::service::{AuthClaims, MemoryAccountStore, ServiceState};

    const SECRET: &str = "s3cr3t";

    fn account(id: i64, number: i64) -> Account {
        Account {
            id,
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            number,
            password_hash: String::new(),
            balance: 0,
            created_at: Timestamp::now().into(),
            deleted_at: None,
        }
    }

    fn claims(account_number: i64) -> AuthClaims {
        AuthClaims::new(account_number, Timestamp::now() + jiff::SignedDuration::from_mins(10))
    }

    async fn server(
        accounts: Arc<dyn AccountStore>,
        calls: Arc<AtomicUsize>,
    ) -> anyhow::Result<(TestServer, SessionKeys)> {
        let session_keys = SessionKeys::from_secret(SECRET)?;
        let state = ServiceState::new(accounts, session_keys.clone());

        let handler = move || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                "ok"
            }
        };

        let app = Router::new()
            .route("/account/{id}", get(handler))
            .route_layer(from_fn_with_state(state.clone(), require_account_owner))
            .with_state(state);

        Ok((TestServer::new(app)?, session_keys))
    }

    async fn scenario() -> anyhow::Result<(TestServer, SessionKeys, Arc<AtomicUsize>)> {
        let store = MemoryAccountStore::new();
        store.insert_account(account(7, 403138)).await?;

        let calls = Arc::new(AtomicUsize::new(0));
        let (server, keys) = server(Arc::new(store), calls.clone()).await?;
        Ok((server, keys, calls))
    }

    #[tokio::test]
    async fn owner_reaches_handler_exactly_once() -> anyhow::Result<()> {
        let (server, keys, calls) = scenario().await?;
        let token = keys.sign_claims(&claims(403138))?;

        let response = server
            .get("/account/7")
            .add_header(AUTH_TOKEN_HEADER, token.as_str())
            .await;

        response.assert_status_ok();
        response.assert_text("ok");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn mismatched_account_number_is_forbidden() -> anyhow::Result<()> {
        let (server, keys, calls) = scenario().await?;
        let token = keys.sign_claims(&claims(999999))?;

        let response = server
            .get("/account/7")
            .add_header(AUTH_TOKEN_HEADER, token.as_str())
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        response.assert_text(r#"{"error":"permission denied"}"#);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_or_empty_header_is_forbidden() -> anyhow::Result<()> {
        let (server, _, calls) = scenario().await?;

        let response = server.get("/account/7").await;
        response.assert_status(StatusCode::FORBIDDEN);
        response.assert_json(&json!({"error": "permission denied"}));

        let response = server.get("/account/7").add_header(AUTH_TOKEN_HEADER, "").await;
        response.assert_status(StatusCode::FORBIDDEN);
        response.assert_json(&json!({"error": "permission denied"}));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn wrong_key_is_forbidden() -> anyhow::Result<()> {
        let (server, _, calls) = scenario().await?;
        let token = SessionKeys::from_secret("wrong")?.sign_claims(&claims(403138))?;

        let response = server
            .get("/account/7")
            .add_header(AUTH_TOKEN_HEADER, token.as_str())
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn non_hmac_algorithm_is_forbidden() -> anyhow::Result<()> {
        let (server, keys, calls) = scenario().await?;
        let token = keys.sign_claims(&claims(403138))?;
        let (_, rest) = token
            .split_once('.')
            .ok_or_else(|| anyhow::anyhow!("token has no header segment"))?;
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let token = format!("{header}.{rest}");

        let response = server
            .get("/account/7")
            .add_header(AUTH_TOKEN_HEADER, token.as_str())
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn expired_token_is_forbidden() -> anyhow::Result<()> {
        let (server, keys, calls) = scenario().await?;
        let expired = AuthClaims {
            account_number: 403138,
            expires_at: Timestamp::now().as_second() - 1,
        };
        let token = keys.sign_claims(&expired)?;

        let response = server
            .get("/account/7")
            .add_header(AUTH_TOKEN_HEADER, token.as_str())
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_or_unparseable_id_is_forbidden() -> anyhow::Result<()> {
        let (server, keys, calls) = scenario().await?;
        let token = keys.sign_claims(&claims(403138))?;

        for path in ["/account/8", "/account/seven"] {
            let response = server
                .get(path)
                .add_header(AUTH_TOKEN_HEADER, token.as_str())
                .await;

            response.assert_status(StatusCode::FORBIDDEN);
            response.assert_json(&json!({"error": "permission denied"}));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    struct FailingStore;

    #[async_trait]
    impl AccountStore for FailingStore {
        async fn create_account(&self, _: NewAccount) -> Result<Account, StoreError> {
            Err(StoreError::storage(std::io::Error::other("database down")))
        }

        async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
            Err(StoreError::storage(std::io::Error::other("database down")))
        }

        async fn find_account_by_id(&self, _: i64) -> Result<Account, StoreError> {
            Err(StoreError::storage(std::io::Error::other("database down")))
        }

        async fn find_account_by_number(&self, _: i64) -> Result<Account, StoreError> {
            Err(StoreError::storage(std::io::Error::other("database down")))
        }

        async fn delete_account(&self, _: i64) -> Result<Account, StoreError> {
            Err(StoreError::storage(std::io::Error::other("database down")))
        }
    }

    #[tokio::test]
    async fn storage_failure_is_internal_error() -> anyhow::Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let (server, keys) = server(Arc::new(FailingStore), calls.clone()).await?;
        let token = keys.sign_claims(&claims(403138))?;

        let response = server
            .get("/account/7")
            .add_header(AUTH_TOKEN_HEADER, token.as_str())
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({"error": "internal server error"}));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[test]
    fn not_found_maps_to_account_not_found() {
        assert!(matches!(
            AuthError::from(StoreError::NotFound),
            AuthError::AccountNotFound
        ));
        assert_eq!(AuthError::AccountMismatch.reason(), "account_mismatch");
    }
}
