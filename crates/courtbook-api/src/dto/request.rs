//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Registration request body.
///
/// Fields default to empty on absence so that a missing field reports as
/// a validation failure (400) rather than a deserialization one.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username.
    #[serde(default)]
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: String,
    /// Email address.
    #[serde(default)]
    #[validate(custom(function = email_shape))]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[serde(default)]
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Logout request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogoutRequest {
    /// Refresh token.
    #[serde(default)]
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// The accepted contract is deliberately loose: an address qualifies as
/// soon as it contains an `@`.
fn email_shape(email: &str) -> Result<(), ValidationError> {
    if email.contains('@') {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_shape");
        err.message = Some("Invalid email format".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::validate;
    use courtbook_core::error::ErrorKind;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn well_formed_registration_passes() {
        assert!(validate(&register("alice", "alice@example.com", "secret1")).is_ok());
    }

    #[test]
    fn short_username_is_rejected() {
        let err = validate(&register("al", "alice@example.com", "secret1")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("Username"));
    }

    #[test]
    fn short_password_is_rejected() {
        let err = validate(&register("alice", "alice@example.com", "short")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("Password"));
    }

    #[test]
    fn email_without_at_is_rejected() {
        let err = validate(&register("alice", "alice.example.com", "secret1")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Invalid email format");
    }

    #[test]
    fn empty_refresh_token_is_rejected() {
        let err = validate(&RefreshRequest {
            refresh_token: String::new(),
        })
        .unwrap_err();
        assert_eq!(err.message, "Refresh token is required");
    }
}
