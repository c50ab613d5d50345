//! Secret manager (HashiCorp Vault) configuration.

use serde::{Deserialize, Serialize};

/// Vault connection and lookup configuration.
///
/// Authentication uses AppRole when `role_id`/`secret_id` are set,
/// otherwise the static `token`. If neither is configured, client
/// construction fails and the process falls back to the environment
/// secret source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Whether to attempt Vault as the primary secret source.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Vault server address.
    #[serde(default = "default_address")]
    pub address: String,
    /// Static client token.
    #[serde(default)]
    pub token: Option<String>,
    /// AppRole role ID.
    #[serde(default)]
    pub role_id: Option<String>,
    /// AppRole secret ID.
    #[serde(default)]
    pub secret_id: Option<String>,
    /// KV v2 path holding the JWT signing secret.
    #[serde(default = "default_secret_path")]
    pub secret_path: String,
    /// Field within the secret that holds the signing key.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            address: default_address(),
            token: None,
            role_id: None,
            secret_id: None,
            secret_path: default_secret_path(),
            secret_key: default_secret_key(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_address() -> String {
    "http://localhost:8200".to_string()
}

fn default_secret_path() -> String {
    "secret/data/courtbook/jwt".to_string()
}

fn default_secret_key() -> String {
    "secret".to_string()
}

fn default_timeout() -> u64 {
    5
}
