//! Application state and dependency injection.

mod config;
mod security;
mod store;

use std::sync::Arc;

pub use crate::service::config::ServiceConfig;
pub use crate::service::security::{
    AuthClaims, ParsedToken, PasswordHasher, SessionKeys, SessionKeysConfig, TokenError,
};
pub use crate::service::store::{
    ACCOUNT_NUMBER_LIMIT, Account, AccountStore, MAX_NUMBER_ATTEMPTS, MemoryAccountStore,
    NewAccount, PgAccountStore, StoreError,
};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    // External services:
    pub accounts: Arc<dyn AccountStore>,

    // Internal services:
    pub password_hasher: PasswordHasher,
    pub session_keys: SessionKeys,
}

impl ServiceState {
    /// Creates application state over an existing account store.
    pub fn new(accounts: Arc<dyn AccountStore>, session_keys: SessionKeys) -> Self {
        Self {
            accounts,
            password_hasher: PasswordHasher::new(),
            session_keys,
        }
    }

    /// Initializes application state from configuration.
    ///
    /// Connects to Postgres, applies migrations and loads the signing keys.
    pub async fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        let session_keys = service_config.load_session_keys()?;
        let pg_client = service_config.connect_postgres().await?;
        let accounts = Arc::new(PgAccountStore::new(pg_client));

        Ok(Self::new(accounts, session_keys))
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(accounts: Arc<dyn AccountStore>);

// Internal services:
impl_di!(password_hasher: PasswordHasher);
impl_di!(session_keys: SessionKeys);
