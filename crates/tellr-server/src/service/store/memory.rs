use std::collections::BTreeMap;

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;

use super::{Account, AccountStore, NewAccount, StoreError};
use crate::TRACING_TARGET_ACCOUNT_STORE;

/// In-memory [`AccountStore`] for tests and local development.
///
/// Mirrors the Postgres store: deletion is soft, and account numbers stay
/// reserved by deleted accounts.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    last_id: i64,
    accounts: BTreeMap<i64, Account>,
}

impl MemoryInner {
    fn number_taken(&self, number: i64) -> bool {
        self.accounts.values().any(|account| account.number == number)
    }
}

impl MemoryAccountStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed account, keeping its identifier.
    ///
    /// Fails with [`StoreError::Conflict`] when the identifier or the number
    /// is already in use. Later inserts through [`AccountStore::create_account`]
    /// get identifiers above every inserted one.
    pub async fn insert_account(&self, account: Account) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.accounts.contains_key(&account.id) || inner.number_taken(account.number) {
            return Err(StoreError::Conflict);
        }

        inner.last_id = inner.last_id.max(account.id);
        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.number_taken(new_account.number) {
            return Err(StoreError::Conflict);
        }

        inner.last_id += 1;
        let account = Account {
            id: inner.last_id,
            first_name: new_account.first_name.trim().to_owned(),
            last_name: new_account.last_name.trim().to_owned(),
            number: new_account.number,
            password_hash: new_account.password_hash,
            balance: 0,
            created_at: Timestamp::now().into(),
            deleted_at: None,
        };

        inner.accounts.insert(account.id, account.clone());
        tracing::debug!(
            target: TRACING_TARGET_ACCOUNT_STORE,
            account_id = account.id,
            "account inserted"
        );

        Ok(account)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let inner = self.inner.read().await;
        let accounts = inner
            .accounts
            .values()
            .filter(|account| !account.is_deleted())
            .cloned()
            .collect();
        Ok(accounts)
    }

    async fn find_account_by_id(&self, account_id: i64) -> Result<Account, StoreError> {
        let inner = self.inner.read().await;
        inner
            .accounts
            .get(&account_id)
            .filter(|account| !account.is_deleted())
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_account_by_number(&self, number: i64) -> Result<Account, StoreError> {
        let inner = self.inner.read().await;
        inner
            .accounts
            .values()
            .find(|account| account.number == number && !account.is_deleted())
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn delete_account(&self, account_id: i64) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .get_mut(&account_id)
            .filter(|account| !account.is_deleted())
            .ok_or(StoreError::NotFound)?;

        account.deleted_at = Some(Timestamp::now().into());
        Ok(account.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(number: i64) -> NewAccount {
        NewAccount {
            first_name: " Ada ".into(),
            last_name: "Lovelace".into(),
            number,
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn create_and_find() -> anyhow::Result<()> {
        let store = MemoryAccountStore::new();
        let created = store.create_account(new_account(403138)).await?;

        assert_eq!(created.id, 1);
        assert_eq!(created.first_name, "Ada");
        assert_eq!(store.find_account_by_id(created.id).await?, created);
        assert_eq!(store.find_account_by_number(403138).await?, created);
        assert_eq!(store.list_accounts().await?, vec![created]);
        Ok(())
    }

    #[tokio::test]
    async fn missing_account_is_not_found() {
        let store = MemoryAccountStore::new();
        assert!(matches!(
            store.find_account_by_id(7).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.find_account_by_number(7).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete_account(7).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn duplicate_number_conflicts() -> anyhow::Result<()> {
        let store = MemoryAccountStore::new();
        store.create_account(new_account(42)).await?;
        assert!(matches!(
            store.create_account(new_account(42)).await,
            Err(StoreError::Conflict)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn deleted_accounts_are_hidden_but_keep_their_number() -> anyhow::Result<()> {
        let store = MemoryAccountStore::new();
        let account = store.create_account(new_account(42)).await?;

        let deleted = store.delete_account(account.id).await?;
        assert!(deleted.is_deleted());

        assert!(matches!(
            store.find_account_by_id(account.id).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete_account(account.id).await,
            Err(StoreError::NotFound)
        ));
        assert!(store.list_accounts().await?.is_empty());
        assert!(matches!(
            store.create_account(new_account(42)).await,
            Err(StoreError::Conflict)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn inserted_ids_are_kept() -> anyhow::Result<()> {
        let store = MemoryAccountStore::new();
        let mut account = store.create_account(new_account(1)).await?;
        account.id = 7;
        account.number = 403138;

        store.insert_account(account).await?;
        assert_eq!(store.find_account_by_id(7).await?.number, 403138);

        let next = store.create_account(new_account(2)).await?;
        assert_eq!(next.id, 8);
        Ok(())
    }
}
