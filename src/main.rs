//! Courtbook Server — session backend for the court-booking platform.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use courtbook_auth::jwt::{JwtDecoder, JwtEncoder};
use courtbook_auth::password::PasswordHasher;
use courtbook_auth::session::{SessionService, TokenPurge};
use courtbook_core::config::AppConfig;
use courtbook_core::error::AppError;
use courtbook_core::traits::{RefreshTokenStore, UserStore};
use courtbook_database::connection::DatabasePool;
use courtbook_database::repositories::{PgRefreshTokenStore, PgUserStore};

#[tokio::main]
async fn main() {
    let env = std::env::var("COURTBOOK_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Courtbook v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    courtbook_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Signing-secret source (Vault with env fallback) ──
    let secrets = courtbook_auth::secrets::connect(&config.vault, &config.auth).await;
    tracing::info!(source = secrets.name(), "Signing-secret source selected");

    // ── Step 3: Stores ───────────────────────────────────────────
    let user_store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(db.pool().clone()));
    let token_store: Arc<dyn RefreshTokenStore> =
        Arc::new(PgRefreshTokenStore::new(db.pool().clone()));

    // ── Step 4: Auth components ──────────────────────────────────
    let password_hasher = Arc::new(PasswordHasher::new(&config.auth)?);
    let jwt_encoder = Arc::new(JwtEncoder::new(Arc::clone(&secrets), &config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(Arc::clone(&secrets), &config.auth));

    let session_service = Arc::new(SessionService::new(
        Arc::clone(&user_store),
        Arc::clone(&token_store),
        Arc::clone(&jwt_encoder),
        Arc::clone(&jwt_decoder),
        Arc::clone(&password_hasher),
    ));

    // ── Step 5: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 6: Background refresh-token purge ───────────────────
    let purge = TokenPurge::new(Arc::clone(&token_store), &config.session);
    let purge_interval =
        std::time::Duration::from_secs(config.session.purge_interval_minutes * 60);
    let mut purge_shutdown = shutdown_rx.clone();

    let purge_handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(purge_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = purge.run_purge().await {
                        tracing::error!(error = %e, "Refresh token purge failed");
                    }
                }
                _ = purge_shutdown.changed() => break,
            }
        }
    });
    tracing::info!(
        interval_minutes = config.session.purge_interval_minutes,
        "Refresh token purge scheduled"
    );

    // ── Step 7: Build and start HTTP server ──────────────────────
    let app_state = courtbook_api::state::AppState {
        config: Arc::new(config.clone()),
        session_service,
        jwt_decoder,
    };

    let app = courtbook_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Courtbook server listening on {}", addr);

    // ── Step 8: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 9: Wait for background tasks ────────────────────────
    let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
    let _ = tokio::time::timeout(grace, purge_handle).await;

    db.close().await;
    tracing::info!("Courtbook server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
