//! PostgreSQL refresh-token store implementation.
//!
//! Every operation is a single SQL statement, which gives the atomicity
//! the store contract requires: a `validate` racing a `revoke` on the
//! same record sees either the old or the new row state.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use courtbook_core::error::{AppError, ErrorKind};
use courtbook_core::result::AppResult;
use courtbook_core::traits::{RefreshTokenError, RefreshTokenStore};
use courtbook_entity::token::{RefreshTokenRecord, hash_token};

/// sqlx-backed [`RefreshTokenStore`].
#[derive(Debug, Clone)]
pub struct PgRefreshTokenStore {
    pool: PgPool,
}

impl PgRefreshTokenStore {
    /// Create a new refresh-token store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
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

        sqlx::query(
            r#"INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at, created_at, revoked)
               VALUES ($1, $2, $3, $4, $5, FALSE)"#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(&record.token_hash)
        .bind(record.expires_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create refresh token", e)
        })?;

        Ok(record)
    }

    async fn validate(&self, token: &str) -> Result<RefreshTokenRecord, RefreshTokenError> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            "SELECT * FROM refresh_tokens WHERE token_hash = $1",
        )
        .bind(hash_token(token))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to validate refresh token", e)
        })?
        .ok_or(RefreshTokenError::NotFound)?;

        if record.revoked {
            return Err(RefreshTokenError::Revoked);
        }
        if record.is_expired(Utc::now()) {
            return Err(RefreshTokenError::Expired);
        }

        Ok(record)
    }

    async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError> {
        let token_hash = hash_token(token);

        // Guarding on `revoked = FALSE` keeps the transition one-way:
        // the original revocation timestamp is never overwritten.
        let updated = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE, revoked_at = $2 WHERE token_hash = $1 AND revoked = FALSE",
        )
        .bind(&token_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke refresh token", e)
        })?
        .rows_affected();

        if updated > 0 {
            return Ok(());
        }

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM refresh_tokens WHERE token_hash = $1)",
        )
        .bind(&token_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check refresh token", e)
        })?;

        if exists {
            // Already revoked; revoking twice is not an error.
            Ok(())
        } else {
            Err(RefreshTokenError::NotFound)
        }
    }

    async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64> {
        let revoked = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE, revoked_at = $2 WHERE user_id = $1 AND revoked = FALSE",
        )
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke user tokens", e)
        })?
        .rows_affected();

        Ok(revoked)
    }

    async fn purge(&self, revoked_retention: Duration) -> AppResult<u64> {
        let now = Utc::now();
        let revoked_cutoff = now - revoked_retention;

        let removed = sqlx::query(
            "DELETE FROM refresh_tokens WHERE expires_at <= $1 OR (revoked AND revoked_at < $2)",
        )
        .bind(now)
        .bind(revoked_cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to purge refresh tokens", e)
        })?
        .rows_affected();

        Ok(removed)
    }
}
