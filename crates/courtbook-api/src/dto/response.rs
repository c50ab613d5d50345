//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courtbook_auth::session::AuthSession;
use courtbook_entity::user::User;

/// Successful registration/login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Access token.
    pub token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Public view of the authenticated user.
    pub user: UserResponse,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.tokens.access_token,
            refresh_token: session.tokens.refresh_token,
            user: session.user.into(),
        }
    }
}

/// Refresh response carrying only the new access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub token: String,
}

/// Public view of a user. The password hash never appears here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.display_name,
            phone: user.phone,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}
