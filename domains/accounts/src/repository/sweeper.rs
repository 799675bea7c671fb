//! Background purge of expired reset tokens
//!
//! Lookups already ignore expired rows; this only keeps the table small.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use converse_common::RepositoryError;

use crate::repository::ResetTokenStore;

/// Delete every token older than `ttl`; returns the number removed
pub async fn sweep_expired(
    store: &dyn ResetTokenStore,
    ttl: chrono::Duration,
) -> Result<u64, RepositoryError> {
    store.delete_expired(Utc::now() - ttl).await
}

/// Run `sweep_expired` every `every` until the handle is aborted
#[mutants::skip] // Endless background loop; sweep_expired is tested directly
pub fn spawn_reset_token_sweeper(
    store: Arc<dyn ResetTokenStore>,
    ttl: chrono::Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);

        loop {
            interval.tick().await;

            match sweep_expired(store.as_ref(), ttl).await {
                Ok(0) => {}
                Ok(count) => tracing::info!(count, "Purged expired reset tokens"),
                Err(e) => tracing::warn!(error = %e, "Reset token sweep failed"),
            }
        }
    })
}
