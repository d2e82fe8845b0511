//! Account storage abstraction.
//!
//! Handlers and the authorization middleware only see [`AccountStore`], so
//! the Postgres store and the in-memory store are interchangeable behind an
//! `Arc<dyn AccountStore>`.

mod memory;
mod postgres;

use async_trait::async_trait;
pub use tellr_postgres::model::{Account, NewAccount};

pub use self::memory::MemoryAccountStore;
pub use self::postgres::PgAccountStore;
use crate::{BoxedError, TRACING_TARGET_ACCOUNT_STORE};

/// Account numbers are drawn uniformly from `0..ACCOUNT_NUMBER_LIMIT`.
pub const ACCOUNT_NUMBER_LIMIT: i64 = 1_000_000;

/// Maximum number of fresh account numbers tried before giving up.
pub const MAX_NUMBER_ATTEMPTS: usize = 5;

/// Error returned by [`AccountStore`] operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No live account matches the lookup.
    #[error("account not found")]
    NotFound,
    /// The account number is already taken.
    #[error("account number already taken")]
    Conflict,
    /// The backing storage failed.
    #[error("storage error: {0}")]
    Storage(#[source] BoxedError),
}

impl StoreError {
    /// Wraps a backend failure.
    pub fn storage(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(error))
    }
}

/// Persistence for account records.
///
/// Lookups and deletes never see soft-deleted accounts. An account number,
/// once used, is never reused, even after its account is deleted.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new account, failing with [`StoreError::Conflict`] when its
    /// number is taken.
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, StoreError>;

    /// Lists live accounts, oldest first.
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Finds a live account by identifier.
    async fn find_account_by_id(&self, account_id: i64) -> Result<Account, StoreError>;

    /// Finds a live account by account number.
    async fn find_account_by_number(&self, number: i64) -> Result<Account, StoreError>;

    /// Soft deletes a live account and returns it.
    async fn delete_account(&self, account_id: i64) -> Result<Account, StoreError>;

    /// Creates an account under a freshly drawn random number.
    ///
    /// Draws again on [`StoreError::Conflict`], up to [`MAX_NUMBER_ATTEMPTS`]
    /// times; the last conflict is returned if every draw collides.
    async fn open_account(
        &self,
        first_name: String,
        last_name: String,
        password_hash: String,
    ) -> Result<Account, StoreError> {
        let mut attempt = 1;
        loop {
            let new_account = NewAccount {
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                number: rand::random_range(0..ACCOUNT_NUMBER_LIMIT),
                password_hash: password_hash.clone(),
            };

            match self.create_account(new_account).await {
                Err(StoreError::Conflict) if attempt < MAX_NUMBER_ATTEMPTS => {
                    tracing::debug!(
                        target: TRACING_TARGET_ACCOUNT_STORE,
                        attempt,
                        "account number collision, drawing a new one"
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Store whose inserts always collide.
    #[derive(Default)]
    struct CollidingStore {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl AccountStore for CollidingStore {
        async fn create_account(&self, _: NewAccount) -> Result<Account, StoreError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Conflict)
        }

        async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
            Ok(Vec::new())
        }

        async fn find_account_by_id(&self, _: i64) -> Result<Account, StoreError> {
            Err(StoreError::NotFound)
        }

        async fn find_account_by_number(&self, _: i64) -> Result<Account, StoreError> {
            Err(StoreError::NotFound)
        }

        async fn delete_account(&self, _: i64) -> Result<Account, StoreError> {
            Err(StoreError::NotFound)
        }
    }

    #[tokio::test]
    async fn open_account_gives_up_after_max_attempts() {
        let store = CollidingStore::default();
        let result = store
            .open_account("Ada".into(), "Lovelace".into(), "hash".into())
            .await;

        assert!(matches!(result, Err(StoreError::Conflict)));
        assert_eq!(store.attempts.load(Ordering::SeqCst), MAX_NUMBER_ATTEMPTS);
    }

    #[tokio::test]
    async fn open_account_draws_number_in_range() -> anyhow::Result<()> {
        let store = MemoryAccountStore::new();
        let account = store
            .open_account("Ada".into(), "Lovelace".into(), "hash".into())
            .await?;

        assert!((0..ACCOUNT_NUMBER_LIMIT).contains(&account.number));
        assert_eq!(account.balance, 0);
        Ok(())
    }
}
