//! Scheduled removal of dead refresh-token records.

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use courtbook_core::config::session::SessionConfig;
use courtbook_core::result::AppResult;
use courtbook_core::traits::RefreshTokenStore;

/// Removes refresh-token records that are expired, or revoked longer ago
/// than the retention window.
///
/// Runs out-of-band on a schedule; the store operations it races against
/// are atomic, so it never interferes with foreground traffic.
#[derive(Clone)]
pub struct TokenPurge {
    /// Refresh-token store.
    tokens: Arc<dyn RefreshTokenStore>,
    /// Retention window for revoked records.
    revoked_retention: Duration,
}

impl std::fmt::Debug for TokenPurge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPurge")
            .field("revoked_retention", &self.revoked_retention)
            .finish()
    }
}

impl TokenPurge {
    /// Creates a new purge handler.
    pub fn new(tokens: Arc<dyn RefreshTokenStore>, config: &SessionConfig) -> Self {
        Self {
            tokens,
            revoked_retention: Duration::days(config.revoked_retention_days),
        }
    }

    /// Runs one purge cycle. Returns the number of records removed.
    pub async fn run_purge(&self) -> AppResult<u64> {
        let removed = self.tokens.purge(self.revoked_retention).await?;

        if removed > 0 {
            info!(removed, "Purged dead refresh tokens");
        }

        Ok(removed)
    }
}
