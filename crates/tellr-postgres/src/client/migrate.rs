//! Embedded schema migrations.

use std::ops::DerefMut;
use std::time::{Duration, Instant};

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use super::custom_hooks;
use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Total duration of the migration run.
    pub duration: Duration,
    /// Versions applied by this run, oldest first.
    pub processed_versions: Vec<String>,
}

impl MigrationResult {
    /// Creates a new migration result.
    pub fn new(duration: Duration, processed_versions: Vec<String>) -> Self {
        Self {
            duration,
            processed_versions,
        }
    }

    /// Returns whether the schema was already up to date.
    #[inline]
    pub fn is_no_op(&self) -> bool {
        self.processed_versions.is_empty()
    }

    /// Returns the last applied migration version, if any.
    pub fn last_processed_version(&self) -> Option<&str> {
        self.processed_versions.last().map(String::as_str)
    }
}

/// Extension trait adding migration support to [`PgClient`].
pub trait PgClientMigrationExt {
    /// Applies every embedded migration not yet recorded in the database.
    ///
    /// Safe to call on every startup.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<MigrationResult>> + Send;
}

impl PgClientMigrationExt for PgClient {
    #[tracing::instrument(skip(self), target = TRACING_TARGET_MIGRATION)]
    async fn run_pending_migrations(&self) -> PgResult<MigrationResult> {
        tracing::info!(target: TRACING_TARGET_MIGRATION, "starting database migrations");

        let start_time = Instant::now();
        let mut conn = self.get_pooled_connection().await?;
        custom_hooks::pre_migrate(conn.deref_mut());

        // The migration harness is synchronous, so it runs on the blocking pool.
        let mut conn: AsyncConnectionWrapper<_> = conn.into();
        let results = spawn_blocking(move || {
            conn.run_pending_migrations(MIGRATIONS)
                .map(|versions| versions.into_iter().map(|v| v.to_string()).collect::<Vec<_>>())
        })
        .await;

        let duration = start_time.elapsed();
        let results = results.map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                duration = ?duration,
                error = %err,
                "migration task panicked"
            );

            PgError::Migration(err.into())
        })?;

        let versions = results.map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                duration = ?duration,
                error = %err,
                "database migrations failed"
            );

            PgError::Migration(err)
        })?;

        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            migrations_count = versions.len(),
            "database migrations completed"
        );

        Ok(MigrationResult::new(duration, versions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_is_no_op() {
        let result = MigrationResult::new(Duration::from_millis(5), vec![]);
        assert!(result.is_no_op());
        assert_eq!(result.last_processed_version(), None);
    }

    #[test]
    fn last_processed_version() {
        let versions = vec!["20250101000000".to_string(), "20250102000000".to_string()];
        let result = MigrationResult::new(Duration::from_millis(5), versions);
        assert!(!result.is_no_op());
        assert_eq!(result.last_processed_version(), Some("20250102000000"));
    }
}
