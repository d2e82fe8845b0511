//! Startup seeding of a demo account.

use anyhow::anyhow;
use tellr_server::service::{Account, ServiceState};

use crate::TRACING_TARGET_SEED;
use crate::config::SeedConfig;

const SEED_FIRST_NAME: &str = "Ritesh";
const SEED_LAST_NAME: &str = "Koushik";

/// Opens the demo account and logs its number.
///
/// Every run opens a new account under a fresh number.
pub async fn seed_accounts(state: &ServiceState, config: &SeedConfig) -> anyhow::Result<Account> {
    let password_hash = state
        .password_hasher
        .hash_password(&config.seed_password)
        .map_err(|err| anyhow!("failed to hash seed password: {err}"))?;

    let account = state
        .accounts
        .open_account(
            SEED_FIRST_NAME.to_owned(),
            SEED_LAST_NAME.to_owned(),
            password_hash,
        )
        .await?;

    tracing::info!(
        target: TRACING_TARGET_SEED,
        account_id = account.id,
        number = account.number,
        "seeded demo account"
    );

    Ok(account)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tellr_server::service::{MemoryAccountStore, SessionKeys};

    use super::*;

    #[tokio::test]
    async fn seeded_account_can_log_in() -> anyhow::Result<()> {
        let store = Arc::new(MemoryAccountStore::new());
        let state = ServiceState::new(store, SessionKeys::from_secret("s3cr3t")?);

        let account = seed_accounts(&state, &SeedConfig::default()).await?;
        assert_eq!(account.first_name, "Ritesh");
        assert_eq!(account.last_name, "Koushik");

        let stored = state.accounts.find_account_by_number(account.number).await?;
        assert_eq!(stored.id, account.id);
        assert!(
            state
                .password_hasher
                .verify_password("hello123", &stored.password_hash)
                .is_ok()
        );
        Ok(())
    }
}
