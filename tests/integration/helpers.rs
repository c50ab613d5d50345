//! Shared test helpers for integration tests.
//!
//! The router under test is the real one; the stores behind it are the
//! deterministic in-memory implementations, so the suite needs no
//! external services.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use courtbook_api::state::AppState;
use courtbook_auth::jwt::{JwtDecoder, JwtEncoder};
use courtbook_auth::password::PasswordHasher;
use courtbook_auth::secrets::EnvSecretSource;
use courtbook_auth::session::SessionService;
use courtbook_core::config::auth::AuthConfig;
use courtbook_core::config::{AppConfig, DatabaseConfig};
use courtbook_database::memory::{MemoryRefreshTokenStore, MemoryUserStore};

/// Signing secret shared by the encoder and decoder under test.
const TEST_SECRET: &str = "integration-test-secret";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Refresh-token store, for crafting records directly
    pub token_store: Arc<MemoryRefreshTokenStore>,
    /// Token encoder, for crafting tokens directly
    pub jwt_encoder: Arc<JwtEncoder>,
}

impl TestApp {
    /// Create a new test application over in-memory stores
    pub fn new() -> Self {
        // Minimal hashing work factor to keep the suite fast.
        let auth_config = AuthConfig {
            hash_memory_kib: 8,
            hash_iterations: 1,
            hash_parallelism: 1,
            ..AuthConfig::default()
        };

        let secrets = Arc::new(EnvSecretSource::with_secret(TEST_SECRET));
        let users = Arc::new(MemoryUserStore::new());
        let tokens = Arc::new(MemoryRefreshTokenStore::new());

        let jwt_encoder = Arc::new(JwtEncoder::new(secrets.clone(), &auth_config));
        let jwt_decoder = Arc::new(JwtDecoder::new(secrets, &auth_config));
        let password_hasher =
            Arc::new(PasswordHasher::new(&auth_config).expect("Failed to build hasher"));

        let session_service = Arc::new(SessionService::new(
            users,
            tokens.clone(),
            jwt_encoder.clone(),
            jwt_decoder.clone(),
            password_hasher,
        ));

        let config = AppConfig {
            server: Default::default(),
            database: DatabaseConfig {
                url: "postgres://unused-in-tests".to_string(),
                max_connections: 1,
                min_connections: 0,
                connect_timeout_seconds: 1,
                idle_timeout_seconds: 1,
            },
            vault: Default::default(),
            auth: auth_config,
            session: Default::default(),
            logging: Default::default(),
        };

        let state = AppState {
            config: Arc::new(config),
            session_service,
            jwt_decoder,
        };

        Self {
            router: courtbook_api::router::build_router(state),
            token_store: tokens,
            jwt_encoder,
        }
    }

    /// Register a user and return the parsed response
    pub async fn register(&self, username: &str, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/auth/register",
            Some(serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            })),
            None,
        )
        .await
    }

    /// Login and return the parsed response
    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/auth/login",
            Some(serde_json::json!({
                "username": username,
                "password": password,
            })),
            None,
        )
        .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let allow = response
            .headers()
            .get("allow")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            allow,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
    /// The `Allow` header, when present
    pub allow: Option<String>,
}

impl TestResponse {
    /// Extract a string field from the body, panicking when absent
    pub fn str_field(&self, field: &str) -> &str {
        self.body
            .get(field)
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| panic!("No '{}' in response: {:?}", field, self.body))
    }
}
