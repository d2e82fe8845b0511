//! Account repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;

use crate::model::{Account, NewAccount};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Unique constraint on `accounts.number`, covering soft-deleted rows.
pub const ACCOUNT_NUMBER_CONSTRAINT: &str = "accounts_number_unique";

/// Repository for account database operations.
///
/// Every lookup excludes soft-deleted rows. Deleted rows still hold their
/// account number, so a number is never handed out twice.
pub trait AccountRepository {
    /// Inserts a new account.
    ///
    /// Fails with a unique violation on [`ACCOUNT_NUMBER_CONSTRAINT`] when the
    /// number is already taken.
    fn create_account(
        &mut self,
        new_account: NewAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    /// Finds a live account by its identifier.
    fn find_account_by_id(
        &mut self,
        account_id: i64,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Finds a live account by its account number.
    fn find_account_by_number(
        &mut self,
        number: i64,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Lists all live accounts, oldest first.
    fn list_accounts(&mut self) -> impl Future<Output = PgResult<Vec<Account>>> + Send;

    /// Soft deletes a live account.
    ///
    /// Returns `None` if no live account has this identifier.
    fn delete_account(
        &mut self,
        account_id: i64,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;
}

impl AccountRepository for PgConnection {
    async fn create_account(&mut self, mut new_account: NewAccount) -> PgResult<Account> {
        use schema::accounts;

        new_account.first_name = new_account.first_name.trim().to_owned();
        new_account.last_name = new_account.last_name.trim().to_owned();

        let account = diesel::insert_into(accounts::table)
            .values(&new_account)
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            account_id = account.id,
            "account inserted"
        );

        Ok(account)
    }

    async fn find_account_by_id(&mut self, account_id: i64) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::id.eq(account_id))
            .filter(dsl::deleted_at.is_null())
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_account_by_number(&mut self, number: i64) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::number.eq(number))
            .filter(dsl::deleted_at.is_null())
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_accounts(&mut self) -> PgResult<Vec<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::deleted_at.is_null())
            .order(dsl::id.asc())
            .select(Account::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_account(&mut self, account_id: i64) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        diesel::update(
            accounts::table
                .filter(dsl::id.eq(account_id))
                .filter(dsl::deleted_at.is_null()),
        )
        .set(dsl::deleted_at.eq(Some(jiff_diesel::Timestamp::from(Timestamp::now()))))
        .returning(Account::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }
}
