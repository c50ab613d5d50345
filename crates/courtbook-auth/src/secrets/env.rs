//! Environment-sourced fallback signing secret.

use async_trait::async_trait;
use tracing::warn;

use courtbook_core::config::auth::{AuthConfig, DEFAULT_JWT_SECRET};
use courtbook_core::result::AppResult;

use super::SecretSource;

/// Fallback [`SecretSource`] backed by local configuration.
///
/// The secret comes from `auth.jwt_secret` (TOML or the
/// `COURTBOOK__AUTH__JWT_SECRET` environment variable). The built-in
/// default lets a development process start without any secret
/// provisioning, but is flagged loudly as unsuitable for production.
#[derive(Debug, Clone)]
pub struct EnvSecretSource {
    secret: String,
}

impl EnvSecretSource {
    /// Builds the fallback source from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        let secret = if config.jwt_secret.is_empty() {
            DEFAULT_JWT_SECRET.to_string()
        } else {
            config.jwt_secret.clone()
        };

        if secret == DEFAULT_JWT_SECRET {
            warn!(
                "Using the built-in development JWT secret; \
                 set COURTBOOK__AUTH__JWT_SECRET before deploying to production"
            );
        }

        Self { secret }
    }

    /// Builds a source around an explicit secret. Test constructor.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl SecretSource for EnvSecretSource {
    async fn signing_secret(&self) -> AppResult<String> {
        Ok(self.secret.clone())
    }

    fn name(&self) -> &'static str {
        "env"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_configured_secret_falls_back_to_default() {
        let config = AuthConfig {
            jwt_secret: String::new(),
            ..AuthConfig::default()
        };

        let source = EnvSecretSource::from_config(&config);
        assert_eq!(source.signing_secret().await.unwrap(), DEFAULT_JWT_SECRET);
    }

    #[tokio::test]
    async fn configured_secret_is_returned_verbatim() {
        let source = EnvSecretSource::with_secret("per-deployment-secret");
        assert_eq!(
            source.signing_secret().await.unwrap(),
            "per-deployment-secret"
        );
    }
}
