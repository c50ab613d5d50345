//! HashiCorp Vault signing-secret source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use courtbook_core::config::vault::VaultConfig;
use courtbook_core::error::AppError;
use courtbook_core::result::AppResult;

use super::SecretSource;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Primary [`SecretSource`] reading the signing key from Vault's KV v2
/// engine at a fixed path.
///
/// Authentication prefers AppRole (`role_id` + `secret_id`) and falls
/// back to a static client token. Construction verifies the server is
/// initialized and unsealed; a failure here is what triggers the
/// process-level fallback to the environment source.
#[derive(Debug, Clone)]
pub struct VaultSecretSource {
    client: Client,
    address: String,
    token: String,
    secret_path: String,
    secret_key: String,
}

impl VaultSecretSource {
    /// Builds and verifies a Vault client from configuration.
    pub async fn connect(config: &VaultConfig) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::external_service(format!("Failed to build Vault HTTP client: {e}"))
            })?;

        let token = match (&config.role_id, &config.secret_id) {
            (Some(role_id), Some(secret_id)) => {
                approle_login(&client, &config.address, role_id, secret_id).await?
            }
            _ => config
                .token
                .clone()
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    AppError::configuration(
                        "Vault token is required: set vault.token or vault.role_id/vault.secret_id",
                    )
                })?,
        };

        let source = Self {
            client,
            address: config.address.trim_end_matches('/').to_string(),
            token,
            secret_path: config.secret_path.trim_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        };

        source.health_check().await?;

        Ok(source)
    }

    /// Verifies the Vault server is initialized and unsealed.
    async fn health_check(&self) -> AppResult<()> {
        let url = format!("{}/v1/sys/health", self.address);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Vault health check failed: {e}")))?;

        let body: Value = response.json().await.map_err(|e| {
            AppError::external_service(format!("Vault health check returned invalid JSON: {e}"))
        })?;

        if !body["initialized"].as_bool().unwrap_or(false) {
            return Err(AppError::external_service("Vault is not initialized"));
        }
        if body["sealed"].as_bool().unwrap_or(true) {
            return Err(AppError::external_service("Vault is sealed"));
        }

        debug!(address = %self.address, "Vault health check passed");
        Ok(())
    }
}

#[async_trait]
impl SecretSource for VaultSecretSource {
    async fn signing_secret(&self) -> AppResult<String> {
        let url = format!("{}/v1/{}", self.address, self.secret_path);

        let response = self
            .client
            .get(&url)
            .header("X-Vault-Token", &self.token)
            .send()
            .await
            .map_err(|e| {
                AppError::external_service(format!(
                    "Failed to read secret from {}: {e}",
                    self.secret_path
                ))
            })?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Vault returned {} for secret at {}",
                response.status(),
                self.secret_path
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            AppError::external_service(format!("Vault secret response is not JSON: {e}"))
        })?;

        let data = body.get("data").ok_or_else(|| {
            AppError::external_service(format!("No secret found at {}", self.secret_path))
        })?;

        // KV v2 nests the payload under data.data; KV v1 returns it flat.
        let fields = match data.get("data") {
            Some(nested) if nested.is_object() => nested,
            _ => data,
        };

        fields
            .get(&self.secret_key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::external_service(format!(
                    "Field '{}' not found in secret at {}",
                    self.secret_key, self.secret_path
                ))
            })
    }

    fn name(&self) -> &'static str {
        "vault"
    }
}

/// Performs AppRole login and returns the issued client token.
async fn approle_login(
    client: &Client,
    address: &str,
    role_id: &str,
    secret_id: &str,
) -> AppResult<String> {
    let url = format!("{}/v1/auth/approle/login", address.trim_end_matches('/'));

    let response = client
        .post(&url)
        .json(&json!({ "role_id": role_id, "secret_id": secret_id }))
        .send()
        .await
        .map_err(|e| AppError::external_service(format!("AppRole login failed: {e}")))?;

    if !response.status().is_success() {
        return Err(AppError::external_service(format!(
            "AppRole login rejected with {}",
            response.status()
        )));
    }

    let body: Value = response.json().await.map_err(|e| {
        AppError::external_service(format!("AppRole login response is not JSON: {e}"))
    })?;

    body["auth"]["client_token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::external_service("No client token returned from AppRole login"))
}
