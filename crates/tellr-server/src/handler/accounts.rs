//! Account handlers.
//!
//! Listing and opening accounts is public. Reading and deleting a single
//! account goes through [`require_account_owner`].

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::middleware::from_fn_with_state;
use axum::routing::get;

use super::request::CreateAccount;
use super::response::{Account, DeletedAccount};
use crate::extract::{Json, Path, TokenHeader, ValidateJson};
use crate::handler::Result;
use crate::middleware::require_account_owner;
use crate::service::{AccountStore, PasswordHasher, ServiceState, SessionKeys};

/// Tracing target for account operations.
const TRACING_TARGET: &str = "tellr_server::handler::accounts";

/// Lists all live accounts.
#[tracing::instrument(skip_all)]
async fn list_accounts(
    State(accounts): State<Arc<dyn AccountStore>>,
) -> Result<Json<Vec<Account>>> {
    let accounts = accounts.list_accounts().await?;

    tracing::debug!(
        target: TRACING_TARGET,
        count = accounts.len(),
        "accounts listed"
    );

    let accounts = accounts.into_iter().map(Account::from_model).collect();
    Ok(Json(accounts))
}

/// Opens an account under a fresh random number.
///
/// The new account's token is returned in the `x-jwt-token` header.
#[tracing::instrument(skip_all)]
async fn create_account(
    State(accounts): State<Arc<dyn AccountStore>>,
    State(password_hasher): State<PasswordHasher>,
    State(session_keys): State<SessionKeys>,
    ValidateJson(request): ValidateJson<CreateAccount>,
) -> Result<(TokenHeader, Json<Account>)> {
    let password_hash = password_hasher.hash_password(&request.password)?;
    let account = accounts
        .open_account(request.first_name, request.last_name, password_hash)
        .await?;

    let token = session_keys.issue_token(account.number)?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = account.id,
        number = account.number,
        "account created"
    );

    Ok((TokenHeader::new(token), Json(Account::from_model(account))))
}

/// Returns the account, once ownership is verified.
#[tracing::instrument(skip_all)]
async fn get_account(
    State(accounts): State<Arc<dyn AccountStore>>,
    Path(account_id): Path<i64>,
) -> Result<Json<Account>> {
    let account = accounts.find_account_by_id(account_id).await?;
    Ok(Json(Account::from_model(account)))
}

/// Soft deletes the account, once ownership is verified.
#[tracing::instrument(skip_all)]
async fn delete_account(
    State(accounts): State<Arc<dyn AccountStore>>,
    Path(account_id): Path<i64>,
) -> Result<Json<DeletedAccount>> {
    let account = accounts.delete_account(account_id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = account.id,
        number = account.number,
        "account deleted"
    );

    Ok(Json(DeletedAccount {
        deleted: account.id,
    }))
}

/// Returns a [`Router`] with all account routes.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    let require_account_owner = from_fn_with_state(state, require_account_owner);

    Router::new()
        .route("/account/{id}", get(get_account).delete(delete_account))
        .route_layer(require_account_owner)
        .route("/account", get(list_accounts).post(create_account))
}
