//! `AuthUser` extractor — pulls the bearer token from the Authorization
//! header, verifies it, and injects the claims.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use courtbook_auth::jwt::Claims;
use courtbook_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Verified access-token claims available to protected handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl std::ops::Deref for AuthUser {
    type Target = Claims;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

        let claims = state
            .jwt_decoder
            .verify(token)
            .await
            .map_err(AppError::from)?;

        Ok(AuthUser(claims))
    }
}
