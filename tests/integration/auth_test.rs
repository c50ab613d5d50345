//! Integration tests for the authentication flow.

use chrono::{Duration, Utc};
use http::StatusCode;
use uuid::Uuid;

use courtbook_core::traits::RefreshTokenStore;

use crate::helpers::TestApp;

#[tokio::test]
async fn full_session_lifecycle() {
    let app = TestApp::new();

    // Register returns 201 with a token pair and the public user view.
    let registered = app
        .register("alice", "alice@example.com", "secret1")
        .await;
    assert_eq!(registered.status, StatusCode::CREATED);
    let access_token = registered.str_field("token").to_string();
    let refresh_token = registered.str_field("refresh_token").to_string();
    let user = registered.body.get("user").expect("No user in response");
    assert_eq!(user.get("username").unwrap(), "alice");
    assert_eq!(user.get("email").unwrap(), "alice@example.com");
    assert!(user.get("password_hash").is_none());

    // The access token authenticates /auth/me.
    let me = app
        .request("GET", "/auth/me", None, Some(&access_token))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.str_field("username"), "alice");

    // The refresh token mints a new access token, which also works.
    let refreshed = app
        .request(
            "POST",
            "/auth/refresh",
            Some(serde_json::json!({ "refresh_token": refresh_token })),
            None,
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    let new_access = refreshed.str_field("token").to_string();
    let me_again = app.request("GET", "/auth/me", None, Some(&new_access)).await;
    assert_eq!(me_again.status, StatusCode::OK);

    // Logout succeeds, after which the same refresh token is dead.
    let logout = app
        .request(
            "POST",
            "/auth/logout",
            Some(serde_json::json!({ "refresh_token": refresh_token })),
            None,
        )
        .await;
    assert_eq!(logout.status, StatusCode::OK);

    let replay = app
        .request(
            "POST",
            "/auth/refresh",
            Some(serde_json::json!({ "refresh_token": refresh_token })),
            None,
        )
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.str_field("message"), "Invalid or expired refresh token");
}

#[tokio::test]
async fn login_after_register_returns_same_user() {
    let app = TestApp::new();

    let registered = app.register("bob", "bob@example.com", "secret1").await;
    assert_eq!(registered.status, StatusCode::CREATED);
    let registered_id = registered.body["user"]["id"].as_str().unwrap().to_string();

    let logged_in = app.login("bob", "secret1").await;
    assert_eq!(logged_in.status, StatusCode::OK);
    assert_eq!(logged_in.body["user"]["id"].as_str().unwrap(), registered_id);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = TestApp::new();
    app.register("alice", "alice@example.com", "secret1").await;

    let same_username = app
        .register("alice", "other@example.com", "secret1")
        .await;
    assert_eq!(same_username.status, StatusCode::CONFLICT);

    let same_email = app.register("bob", "alice@example.com", "secret1").await;
    assert_eq!(same_email.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn registration_validation_failures() {
    let app = TestApp::new();

    let short_username = app.register("al", "al@example.com", "secret1").await;
    assert_eq!(short_username.status, StatusCode::BAD_REQUEST);

    let short_password = app.register("alice", "alice@example.com", "short").await;
    assert_eq!(short_password.status, StatusCode::BAD_REQUEST);

    let bad_email = app.register("alice", "alice.example.com", "secret1").await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.str_field("message"), "Invalid email format");

    // Missing fields are a validation failure, not a parse failure.
    let missing = app
        .request("POST", "/auth/register", Some(serde_json::json!({})), None)
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.register("alice", "alice@example.com", "secret1").await;

    let wrong_password = app.login("alice", "wrong-password").await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);

    let unknown_user = app.login("mallory", "secret1").await;
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);

    // Byte-identical bodies: no account enumeration signal.
    assert_eq!(wrong_password.body, unknown_user.body);
    assert_eq!(wrong_password.str_field("message"), "Invalid credentials");
}

#[tokio::test]
async fn me_requires_a_valid_bearer_token() {
    let app = TestApp::new();

    let no_token = app.request("GET", "/auth/me", None, None).await;
    assert_eq!(no_token.status, StatusCode::UNAUTHORIZED);

    let garbage = app
        .request("GET", "/auth/me", None, Some("not-a-token"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_refresh_token_is_rejected() {
    let app = TestApp::new();

    // A token whose signature is ours but whose lifetime is already over,
    // with a matching expired store record.
    let user_id = Uuid::new_v4();
    let (token, _) = app
        .jwt_encoder
        .issue(user_id, "ghost", Duration::seconds(-5))
        .await
        .unwrap();
    app.token_store
        .create(user_id, &token, Utc::now() - Duration::seconds(5))
        .await
        .unwrap();

    let response = app
        .request(
            "POST",
            "/auth/refresh",
            Some(serde_json::json!({ "refresh_token": token })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.str_field("message"), "Invalid or expired refresh token");
}

#[tokio::test]
async fn refresh_requires_the_token_field() {
    let app = TestApp::new();

    let missing = app
        .request("POST", "/auth/refresh", Some(serde_json::json!({})), None)
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let empty = app
        .request(
            "POST",
            "/auth/refresh",
            Some(serde_json::json!({ "refresh_token": "" })),
            None,
        )
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_never_reveals_token_state() {
    let app = TestApp::new();

    // A token that was never issued still logs out successfully.
    let unknown = app
        .request(
            "POST",
            "/auth/logout",
            Some(serde_json::json!({ "refresh_token": "never-issued" })),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::OK);

    // A missing field is the only failure.
    let missing = app
        .request("POST", "/auth/logout", Some(serde_json::json!({})), None)
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_method_gets_405_with_allow_header() {
    let app = TestApp::new();

    let response = app.request("GET", "/auth/login", None, None).await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    let allow = response.allow.expect("No Allow header on 405");
    assert!(allow.contains("POST"));

    let response = app.request("POST", "/auth/me", None, None).await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health_endpoint_is_open() {
    let app = TestApp::new();

    let response = app.request("GET", "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.str_field("status"), "ok");
}
