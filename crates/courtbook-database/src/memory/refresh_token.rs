//! In-memory refresh-token store for tests and single-process setups.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use courtbook_core::result::AppResult;
use courtbook_core::traits::{RefreshTokenError, RefreshTokenStore};
use courtbook_entity::token::{RefreshTokenRecord, hash_token};

/// In-memory [`RefreshTokenStore`] keyed by token fingerprint.
#[derive(Debug, Clone, Default)]
pub struct MemoryRefreshTokenStore {
    records: Arc<Mutex<HashMap<String, RefreshTokenRecord>>>,
}

impl MemoryRefreshTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held, purged or not. Test helper.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Whether the store holds no records. Test helper.
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn create(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshTokenRecord> {
        let record = RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id,
            token_hash: hash_token(token),
            expires_at,
            created_at: Utc::now(),
            revoked: false,
            revoked_at: None,
        };

        let mut records = self.records.lock().await;
        records.insert(record.token_hash.clone(), record.clone());
        Ok(record)
    }

    async fn validate(&self, token: &str) -> Result<RefreshTokenRecord, RefreshTokenError> {
        let records = self.records.lock().await;
        let record = records
            .get(&hash_token(token))
            .ok_or(RefreshTokenError::NotFound)?;

        if record.revoked {
            return Err(RefreshTokenError::Revoked);
        }
        if record.is_expired(Utc::now()) {
            return Err(RefreshTokenError::Expired);
        }

        Ok(record.clone())
    }

    async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError> {
        let mut records = self.records.lock().await;
        let record = records
            .get_mut(&hash_token(token))
            .ok_or(RefreshTokenError::NotFound)?;

        // One-way transition; the first revocation timestamp sticks.
        if !record.revoked {
            record.revoked = true;
            record.revoked_at = Some(Utc::now());
        }

        Ok(())
    }

    async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64> {
        let mut records = self.records.lock().await;
        let now = Utc::now();
        let mut revoked = 0u64;

        for record in records.values_mut() {
            if record.user_id == user_id && !record.revoked {
                record.revoked = true;
                record.revoked_at = Some(now);
                revoked += 1;
            }
        }

        Ok(revoked)
    }

    async fn purge(&self, revoked_retention: Duration) -> AppResult<u64> {
        let mut records = self.records.lock().await;
        let now = Utc::now();
        let revoked_cutoff = now - revoked_retention;
        let before = records.len();

        records.retain(|_, record| {
            let expired = record.is_expired(now);
            let stale_revoked = record.revoked
                && record.revoked_at.map(|at| at < revoked_cutoff).unwrap_or(false);
            !(expired || stale_revoked)
        });

        Ok((before - records.len()) as u64)
    }
}
