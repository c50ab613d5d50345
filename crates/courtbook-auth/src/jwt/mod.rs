//! Signed claim-set encoding and validation.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::Claims;
pub use decoder::JwtDecoder;
pub use encoder::{JwtEncoder, TokenPair};

use thiserror::Error;

use courtbook_core::error::AppError;

/// Why a token failed verification.
///
/// The first three variants all surface to callers as 401; `Secret` is an
/// infrastructure failure and surfaces as 500.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The compact string could not be parsed as a token.
    #[error("malformed token")]
    Malformed,
    /// The signature does not verify against the current secret, or the
    /// header names an algorithm we do not accept.
    #[error("invalid token signature")]
    BadSignature,
    /// The token's expiry instant has passed.
    #[error("token has expired")]
    Expired,
    /// The signing secret could not be retrieved.
    #[error(transparent)]
    Secret(AppError),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => AppError::unauthorized("Invalid token format"),
            TokenError::BadSignature => AppError::unauthorized("Invalid token signature"),
            TokenError::Expired => AppError::unauthorized("Token has expired"),
            TokenError::Secret(inner) => inner,
        }
    }
}
