//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use courtbook_auth::jwt::JwtDecoder;
use courtbook_auth::session::SessionService;
use courtbook_core::config::AppConfig;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Session lifecycle service.
    pub session_service: Arc<SessionService>,
    /// Access-token verifier used by the auth extractor.
    pub jwt_decoder: Arc<JwtDecoder>,
}
