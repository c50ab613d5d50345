//! Route definitions for the Courtbook HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor. Wrong-method requests get a 405 with an
//! `Allow` header from the method router.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Auth endpoints: register, login, refresh, logout, me.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// Health check endpoint (no auth required).
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}
