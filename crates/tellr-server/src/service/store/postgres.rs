use async_trait::async_trait;
use tellr_postgres::query::{ACCOUNT_NUMBER_CONSTRAINT, AccountRepository};
use tellr_postgres::{PgClient, PgConn, PgError};

use super::{Account, AccountStore, NewAccount, StoreError};

/// [`AccountStore`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pg_client: PgClient,
}

impl PgAccountStore {
    /// Creates a new store over the given client.
    pub fn new(pg_client: PgClient) -> Self {
        Self { pg_client }
    }

    async fn connection(&self) -> Result<PgConn, StoreError> {
        Ok(self.pg_client.get_connection().await?)
    }
}

impl From<PgError> for StoreError {
    fn from(error: PgError) -> Self {
        if error.is_unique_violation() && error.constraint() == Some(ACCOUNT_NUMBER_CONSTRAINT) {
            StoreError::Conflict
        } else {
            StoreError::storage(error)
        }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, StoreError> {
        let mut conn = self.connection().await?;
        Ok(conn.create_account(new_account).await?)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let mut conn = self.connection().await?;
        Ok(conn.list_accounts().await?)
    }

    async fn find_account_by_id(&self, account_id: i64) -> Result<Account, StoreError> {
        let mut conn = self.connection().await?;
        conn.find_account_by_id(account_id)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn find_account_by_number(&self, number: i64) -> Result<Account, StoreError> {
        let mut conn = self.connection().await?;
        conn.find_account_by_number(number)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete_account(&self, account_id: i64) -> Result<Account, StoreError> {
        let mut conn = self.connection().await?;
        conn.delete_account(account_id)
            .await?
            .ok_or(StoreError::NotFound)
    }
}
