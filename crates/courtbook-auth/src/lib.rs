//! # courtbook-auth
//!
//! Session lifecycle management for Courtbook.
//!
//! ## Modules
//!
//! - `secrets` — signing-secret sources (Vault primary, environment fallback)
//! - `password` — Argon2id password hashing and verification
//! - `jwt` — signed claim-set encoding and validation
//! - `session` — the login / register / refresh / logout orchestration and
//!   the scheduled refresh-token purge

pub mod jwt;
pub mod password;
pub mod secrets;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenError, TokenPair};
pub use password::PasswordHasher;
pub use secrets::{EnvSecretSource, SecretSource, VaultSecretSource};
pub use session::{SessionService, TokenPurge};
