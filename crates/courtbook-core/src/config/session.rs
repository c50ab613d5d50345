//! Refresh-token lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Refresh-token purge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Interval between purge runs in minutes.
    #[serde(default = "default_purge_interval")]
    pub purge_interval_minutes: u64,
    /// How long revoked records are retained before they become
    /// purge-eligible, in days.
    #[serde(default = "default_revoked_retention")]
    pub revoked_retention_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            purge_interval_minutes: default_purge_interval(),
            revoked_retention_days: default_revoked_retention(),
        }
    }
}

fn default_purge_interval() -> u64 {
    60
}

fn default_revoked_retention() -> i64 {
    30
}
