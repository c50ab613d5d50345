//! Refresh-token record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One outstanding refresh grant.
///
/// A record transitions `active -> revoked` exactly once and never
/// reverses. A user holds one record per device/session; records are
/// garbage-collected by the purge job once expired or long-revoked.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshTokenRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// SHA-256 hex fingerprint of the raw token string.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// Natural expiry instant.
    pub expires_at: DateTime<Utc>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Whether the record has been revoked.
    pub revoked: bool,
    /// When the record was revoked, if it was.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Whether the record's natural expiry has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the record can still back a refresh.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_in: Duration, revoked: bool) -> RefreshTokenRecord {
        let now = Utc::now();
        RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "fingerprint".to_string(),
            expires_at: now + expires_in,
            created_at: now,
            revoked,
            revoked_at: revoked.then_some(now),
        }
    }

    #[test]
    fn active_until_expiry() {
        let rec = record(Duration::days(7), false);
        assert!(rec.is_active(Utc::now()));
        assert!(!rec.is_active(rec.expires_at));
    }

    #[test]
    fn revoked_is_never_active() {
        let rec = record(Duration::days(7), true);
        assert!(!rec.is_active(Utc::now()));
    }
}
