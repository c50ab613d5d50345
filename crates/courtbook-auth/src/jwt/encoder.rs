//! Token creation with configurable signing and TTL.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use courtbook_core::config::auth::AuthConfig;
use courtbook_core::error::AppError;
use courtbook_core::result::AppResult;

use crate::secrets::SecretSource;

use super::claims::Claims;

/// Creates signed access and refresh tokens.
///
/// The signing secret is fetched from the [`SecretSource`] on every mint,
/// so a rotated secret takes effect immediately.
#[derive(Clone)]
pub struct JwtEncoder {
    /// Secret source supplying the HMAC key.
    secrets: Arc<dyn SecretSource>,
    /// Issuer claim stamped into every token.
    issuer: String,
    /// Access token TTL in minutes.
    access_ttl_minutes: i64,
    /// Refresh token TTL in days.
    refresh_ttl_days: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .finish()
    }
}

/// Result of a successful token pair generation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(secrets: Arc<dyn SecretSource>, config: &AuthConfig) -> Self {
        Self {
            secrets,
            issuer: config.jwt_issuer.clone(),
            access_ttl_minutes: config.access_ttl_minutes,
            refresh_ttl_days: config.refresh_ttl_days,
        }
    }

    /// Builds and signs a token for the given user with the given TTL.
    pub async fn issue(
        &self,
        user_id: Uuid,
        username: &str,
        ttl: Duration,
    ) -> AppResult<(String, DateTime<Utc>)> {
        let secret = self.secrets.signing_secret().await?;

        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))?;

        Ok((token, expires_at))
    }

    /// Generates a standalone access token (e.g. after refresh).
    pub async fn issue_access_token(
        &self,
        user_id: Uuid,
        username: &str,
    ) -> AppResult<(String, DateTime<Utc>)> {
        self.issue(user_id, username, Duration::minutes(self.access_ttl_minutes))
            .await
    }

    /// Generates a new access + refresh token pair for the given user.
    pub async fn issue_pair(&self, user_id: Uuid, username: &str) -> AppResult<TokenPair> {
        let (access_token, access_expires_at) = self.issue_access_token(user_id, username).await?;

        let (refresh_token, refresh_expires_at) = self
            .issue(user_id, username, Duration::days(self.refresh_ttl_days))
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }
}
