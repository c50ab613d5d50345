//! Token validation.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use courtbook_core::config::auth::AuthConfig;

use crate::secrets::SecretSource;

use super::TokenError;
use super::claims::Claims;

/// Validates signed tokens.
///
/// Only HS256 is accepted: a token whose header names any other algorithm
/// ("none" included) is rejected before signature checking. Expiry is
/// enforced with zero leeway, so a token is invalid from its expiry
/// instant onward.
#[derive(Clone)]
pub struct JwtDecoder {
    /// Secret source supplying the HMAC key.
    secrets: Arc<dyn SecretSource>,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(secrets: Arc<dyn SecretSource>, config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[&config.jwt_issuer]);

        Self {
            secrets,
            validation,
        }
    }

    /// Decodes and validates a token string, returning its claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let secret = self
            .secrets
            .signing_secret()
            .await
            .map_err(TokenError::Secret)?;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &self.validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature
            | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm
            | jsonwebtoken::errors::ErrorKind::InvalidIssuer => TokenError::BadSignature,
            _ => TokenError::Malformed,
        })?;

        Ok(token_data.claims)
    }
}
