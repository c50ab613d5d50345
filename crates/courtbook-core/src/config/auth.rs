//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Fallback JWT signing secret used when no secret manager is reachable.
///
/// Safe to boot a development process with, unsuitable for production.
pub const DEFAULT_JWT_SECRET: &str = "courtbook-dev-jwt-secret-change-in-production";

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Fallback secret key for JWT signing (HMAC-SHA256), used when the
    /// secret manager is unavailable.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Issuer claim stamped into every token.
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: i64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: i64,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_hash_memory")]
    pub hash_memory_kib: u32,
    /// Argon2 iteration count.
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,
    /// Argon2 lane count.
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_issuer(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            hash_memory_kib: default_hash_memory(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
        }
    }
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_issuer() -> String {
    "courtbook".to_string()
}

fn default_access_ttl() -> i64 {
    15
}

fn default_refresh_ttl() -> i64 {
    7
}

fn default_hash_memory() -> u32 {
    19456
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}
