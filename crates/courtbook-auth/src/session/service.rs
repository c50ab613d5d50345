//! Session service — orchestrates credential verification, token
//! issuance, and refresh-token lifecycle.
//!
//! A session, observed through its refresh-token record, moves
//! `absent -> active -> revoked/expired` and never resurrects.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use courtbook_core::error::AppError;
use courtbook_core::result::AppResult;
use courtbook_core::traits::{RefreshTokenError, RefreshTokenStore, UserStore};
use courtbook_entity::user::{NewUser, User};

use crate::jwt::encoder::TokenPair;
use crate::jwt::{Claims, JwtDecoder, JwtEncoder, TokenError};
use crate::password::PasswordHasher;

/// Identical message for unknown-user and wrong-password failures, so a
/// caller cannot enumerate accounts.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Identical message for not-found, revoked, and expired refresh tokens,
/// so a caller cannot probe token state.
const INVALID_REFRESH_TOKEN: &str = "Invalid or expired refresh token";

/// Data accepted for a new registration. Field shape is enforced at the
/// request boundary before this reaches the service.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The authenticated user.
    pub user: User,
    /// Generated token pair.
    pub tokens: TokenPair,
}

/// A freshly minted access token.
#[derive(Debug, Clone)]
pub struct AccessGrant {
    /// Signed access token.
    pub token: String,
    /// Its expiry instant.
    pub expires_at: DateTime<Utc>,
}

/// Orchestrates the login / register / refresh / logout / whoami flows.
#[derive(Clone)]
pub struct SessionService {
    /// User record store.
    users: Arc<dyn UserStore>,
    /// Refresh-token record store.
    tokens: Arc<dyn RefreshTokenStore>,
    /// Token encoder.
    encoder: Arc<JwtEncoder>,
    /// Token decoder.
    decoder: Arc<JwtDecoder>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService").finish()
    }
}

impl SessionService {
    /// Creates a new session service with all required dependencies.
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn RefreshTokenStore>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            users,
            tokens,
            encoder,
            decoder,
            hasher,
        }
    }

    /// Registers a new user and opens their first session.
    pub async fn register(&self, registration: NewRegistration) -> AppResult<AuthSession> {
        if self
            .users
            .find_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("User already exists"));
        }
        if self.users.find_by_email(&registration.email).await?.is_some() {
            return Err(AppError::conflict("User already exists"));
        }

        let password_hash = self.hasher.hash(&registration.password)?;

        // The store's unique constraints settle concurrent duplicate
        // registrations that slip past the checks above.
        let user = self
            .users
            .create(NewUser {
                username: registration.username,
                email: registration.email,
                password_hash,
                display_name: None,
                phone: None,
            })
            .await?;

        let tokens = self.open_session(&user).await?;

        info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(AuthSession { user, tokens })
    }

    /// Verifies credentials and opens a new session.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the
    /// caller.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthSession> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !self.hasher.verify(password, &user.password_hash)? {
            debug!(user_id = %user.id, "Password verification failed");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let tokens = self.open_session(&user).await?;

        info!(user_id = %user.id, "Login successful");

        Ok(AuthSession { user, tokens })
    }

    /// Exchanges a valid refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated; the same token remains
    /// valid until its expiry or revocation.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AccessGrant> {
        if refresh_token.trim().is_empty() {
            return Err(AppError::validation("Refresh token is required"));
        }

        // The signature must verify, and the backing record must still be
        // active: a structurally valid token is not sufficient on its own.
        self.decoder.verify(refresh_token).await.map_err(|e| match e {
            TokenError::Secret(inner) => inner,
            _ => AppError::unauthorized(INVALID_REFRESH_TOKEN),
        })?;

        let record = self.tokens.validate(refresh_token).await.map_err(|e| match e {
            RefreshTokenError::Store(inner) => inner,
            _ => AppError::unauthorized(INVALID_REFRESH_TOKEN),
        })?;

        let user = self
            .users
            .find_by_id(record.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let (token, expires_at) = self.encoder.issue_access_token(user.id, &user.username).await?;

        debug!(user_id = %user.id, "Access token refreshed");

        Ok(AccessGrant { token, expires_at })
    }

    /// Revokes the session behind a refresh token.
    ///
    /// Succeeds even when the token was never issued: logout must not
    /// reveal whether a token exists.
    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        if refresh_token.trim().is_empty() {
            return Err(AppError::validation("Refresh token is required"));
        }

        match self.tokens.revoke(refresh_token).await {
            Ok(()) => {
                debug!("Refresh token revoked");
                Ok(())
            }
            Err(RefreshTokenError::Store(inner)) => Err(inner),
            Err(_) => {
                debug!("Logout for an unknown refresh token");
                Ok(())
            }
        }
    }

    /// Revokes every active session of a user ("log out everywhere").
    pub async fn logout_all(&self, user_id: Uuid) -> AppResult<u64> {
        let revoked = self.tokens.revoke_all(user_id).await?;
        info!(user_id = %user_id, revoked, "Revoked all user sessions");
        Ok(revoked)
    }

    /// Resolves the user behind verified access-token claims.
    pub async fn current_user(&self, claims: &Claims) -> AppResult<User> {
        self.users
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Mints a token pair and persists the refresh record.
    ///
    /// Persistence failure fails the whole operation: a refresh token the
    /// store does not know about must never reach the caller.
    async fn open_session(&self, user: &User) -> AppResult<TokenPair> {
        let tokens = self.encoder.issue_pair(user.id, &user.username).await?;

        self.tokens
            .create(user.id, &tokens.refresh_token, tokens.refresh_expires_at)
            .await
            .map_err(|e| {
                AppError::with_source(
                    courtbook_core::error::ErrorKind::Internal,
                    "Failed to persist refresh token",
                    e,
                )
            })?;

        Ok(tokens)
    }
}
