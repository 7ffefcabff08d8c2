use axum::http::StatusCode;
use ct_api::router;
use serde_json::json;

use crate::common::{self, TestClient};

#[tokio::test]
async fn test_health_check() {
    let state = common::test_state();
    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client.get("/health").await;

    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let state = common::test_state();
    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client.get("/does-not-exist").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_registration_success() {
    let state = common::test_state();
    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let body = json!({
        "username": "newuser",
        "password": "SecureP@ssw0rd123"
    });

    let response = client.post_json("/auth/register", &body).await;

    response.assert_status(StatusCode::CREATED);

    let json: serde_json::Value = response.json();
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("Account created")
    );
}

#[tokio::test]
async fn test_registration_duplicate_username_conflicts() {
    let state = common::test_state();
    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let body = json!({ "username": "taken", "password": "SecureP@ssw0rd123" });
    client.post_json("/auth/register", &body).await;

    // A second signup differing only in case and whitespace still conflicts
    let body = json!({ "username": " Taken ", "password": "other" });
    let response = client.post_json("/auth/register", &body).await;

    response.assert_status(StatusCode::CONFLICT);

    let json: serde_json::Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn test_registration_rejects_empty_username() {
    let state = common::test_state();
    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let body = json!({ "username": "   ", "password": "SecureP@ssw0rd123" });
    let response = client.post_json("/auth/register", &body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_sets_auth_cookie() {
    let state = common::test_state();
    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let body = json!({ "username": "alice", "password": "SecureP@ssw0rd123" });
    client.post_json("/auth/register", &body).await;

    let response = client.post_json("/auth/login", &body).await;

    response.assert_status(StatusCode::OK);

    let json: serde_json::Value = response.json();
    assert_eq!(json["username"].as_str().unwrap(), "alice");

    let cookie = response.get_cookie("auth_token");
    assert!(cookie.is_some(), "Login should set the auth_token cookie");
}

#[tokio::test]
async fn test_login_normalizes_username() {
    let state = common::test_state();
    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    // Sign up with surrounding whitespace and mixed case
    let body = json!({ "username": " Foo ", "password": "SecureP@ssw0rd123" });
    client.post_json("/auth/register", &body).await;

    // Log in with the canonical form
    let body = json!({ "username": "foo", "password": "SecureP@ssw0rd123" });
    let response = client.post_json("/auth/login", &body).await;

    response.assert_status(StatusCode::OK);

    let json: serde_json::Value = response.json();
    assert_eq!(json["username"].as_str().unwrap(), "foo");
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() {
    let state = common::test_state();
    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let body = json!({ "username": "alice", "password": "SecureP@ssw0rd123" });
    client.post_json("/auth/register", &body).await;

    let body = json!({ "username": "alice", "password": "wrong" });
    let response = client.post_json("/auth/login", &body).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_unknown_user_fails() {
    let state = common::test_state();
    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let body = json!({ "username": "nobody", "password": "whatever" });
    let response = client.post_json("/auth/login", &body).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_me_without_token() {
    let state = common::test_state();
    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client.get("/auth/me").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_me_with_token() {
    let state = common::test_state();
    let app = router::router().with_state(state.clone());
    let client = TestClient::new(app);

    let token = common::jwt::create_test_token("alice", &state.auth.jwt_secret);
    let response = client
        .get_with_auth("/auth/me", &token, &state.cookie_key)
        .await;

    response.assert_status(StatusCode::OK);

    let json: serde_json::Value = response.json();
    assert_eq!(json["username"].as_str().unwrap(), "alice");
}

#[tokio::test]
async fn test_auth_me_with_garbage_cookie_fails() {
    let state = common::test_state();
    let app = router::router().with_state(state.clone());
    let client = TestClient::new(app);

    let response = client
        .get_with_auth("/auth/me", "not.a.jwt", &state.cookie_key)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let state = common::test_state();
    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client.get("/auth/logout").await;

    response.assert_status(StatusCode::OK);

    let cookie = response.get_cookie("auth_token");
    assert!(cookie.is_some(), "Logout should send a removal cookie");
}
