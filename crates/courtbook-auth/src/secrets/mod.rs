//! Signing-secret sources.
//!
//! The symmetric key used to sign and verify tokens comes from a
//! [`SecretSource`]: Vault when reachable, the local configuration
//! otherwise. Selection happens once at process start; retrieval happens
//! lazily on every mint/verify, so a rotated secret takes effect on the
//! next call.

pub mod env;
pub mod vault;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use courtbook_core::config::auth::AuthConfig;
use courtbook_core::config::vault::VaultConfig;
use courtbook_core::result::AppResult;

pub use env::EnvSecretSource;
pub use vault::VaultSecretSource;

/// Supplies the symmetric JWT signing key.
#[async_trait]
pub trait SecretSource: Send + Sync + 'static {
    /// Fetch the current signing secret. Each call is authoritative; no
    /// caching contract is assumed.
    async fn signing_secret(&self) -> AppResult<String>;

    /// Short source name for logs.
    fn name(&self) -> &'static str;
}

/// Select the secret source for this process.
///
/// Attempts the Vault client when enabled; any construction failure
/// (network, auth, missing config) degrades to the environment-sourced
/// fallback with a visible warning instead of crashing the process.
pub async fn connect(vault: &VaultConfig, auth: &AuthConfig) -> Arc<dyn SecretSource> {
    if vault.enabled {
        match VaultSecretSource::connect(vault).await {
            Ok(source) => {
                info!(
                    address = %vault.address,
                    path = %vault.secret_path,
                    "Using Vault as the signing-secret source"
                );
                return Arc::new(source);
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "Vault secret source unavailable, falling back to environment secret"
                );
            }
        }
    } else {
        info!("Vault secret source disabled by configuration");
    }

    Arc::new(EnvSecretSource::from_config(auth))
}
