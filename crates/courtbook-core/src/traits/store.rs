//! Store traits for users and refresh tokens.
//!
//! Each trait has a persistent (Postgres) implementation and a
//! deterministic in-memory one used by the test suites. Both must satisfy
//! the same contract: every operation is atomic with respect to other
//! operations on the same record, so a `validate` racing a `revoke`
//! observes either the pre- or post-revocation state, never a torn read.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use courtbook_entity::token::RefreshTokenRecord;
use courtbook_entity::user::{NewUser, User};

use crate::error::AppError;
use crate::result::AppResult;

/// Lookup and creation of user records.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by username (case-insensitive).
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user. A username or email collision yields a
    /// `Conflict` error, never a silent overwrite.
    async fn create(&self, user: NewUser) -> AppResult<User>;
}

/// Why a refresh token failed store validation.
///
/// The three terminal variants are deliberately collapsed into a single
/// generic message before reaching a caller, so that the API never leaks
/// which case applied.
#[derive(Debug, Error)]
pub enum RefreshTokenError {
    /// No record matches the presented token.
    #[error("refresh token not found")]
    NotFound,
    /// The record was revoked before its natural expiry.
    #[error("refresh token has been revoked")]
    Revoked,
    /// The record's expiry instant has passed.
    #[error("refresh token has expired")]
    Expired,
    /// The store itself failed.
    #[error(transparent)]
    Store(#[from] AppError),
}

/// Persistence of refresh-token records.
///
/// Implementations store only a hash of the token string; the raw value
/// exists solely in the client's hands.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + 'static {
    /// Persist a new active record for the given raw token value.
    async fn create(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshTokenRecord>;

    /// Look up the record for a raw token value and check it is active.
    async fn validate(&self, token: &str) -> Result<RefreshTokenRecord, RefreshTokenError>;

    /// Mark the record for a raw token value as revoked.
    ///
    /// Revoking an already-revoked record succeeds without touching its
    /// original revocation timestamp; only a completely unknown token
    /// reports [`RefreshTokenError::NotFound`].
    async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError>;

    /// Revoke every active record owned by the user. Returns the number
    /// of records revoked.
    async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64>;

    /// Delete records that are expired, or revoked longer ago than the
    /// retention window. Returns the number of records removed.
    async fn purge(&self, revoked_retention: Duration) -> AppResult<u64>;
}
