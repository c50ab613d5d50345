//! Auth handlers — register, login, refresh, logout, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use courtbook_auth::session::NewRegistration;

use crate::dto;
use crate::dto::request::{LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{AuthResponse, TokenResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    dto::validate(&req)?;

    let session = state
        .session_service
        .register(NewRegistration {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    dto::validate(&req)?;

    let session = state
        .session_service
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(session.into()))
}

/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    dto::validate(&req)?;

    let grant = state.session_service.refresh(&req.refresh_token).await?;

    Ok(Json(TokenResponse { token: grant.token }))
}

/// POST /auth/logout
///
/// Responds 200 whenever the field is present, even for tokens that were
/// never issued.
pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<LogoutRequest>,
) -> Result<StatusCode, ApiError> {
    dto::validate(&req)?;

    state.session_service.logout(&req.refresh_token).await?;

    Ok(StatusCode::OK)
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.session_service.current_user(&auth).await?;

    Ok(Json(user.into()))
}
