use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use axum_extra::extract::cookie::Key;
use ct_api::{
    config::{ApiConfig, Environment},
    state::ApiState,
};
use ct_store::MemStore;
use http_body_util::BodyExt;
use serde::Deserialize;
use tower::ServiceExt;

/// Test configuration
pub struct TestConfig {
    pub jwt_secret: String,
    pub cookie_secret: String,
    pub bcrypt_cost: u32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test_jwt_secret_minimum_32_characters_long".to_string(),
            cookie_secret: "test_cookie_secret_minimum_64_characters_long_for_secure_encryption"
                .to_string(),
            // Minimum cost keeps the password hashing in tests fast
            bcrypt_cost: 4,
        }
    }
}

/// Build a test ApiState backed by a fresh in-memory store
pub fn test_state() -> ApiState {
    let test_config = TestConfig::default();
    let config = ApiConfig {
        database_url: None,
        jwt_secret: test_config.jwt_secret,
        cookie_secret: test_config.cookie_secret,
        bcrypt_cost: test_config.bcrypt_cost,
        env: Environment::Development,
    };

    ApiState::new(&config, Arc::new(MemStore::new()))
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with JSON body
    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a GET request with authentication cookie
    pub async fn get_with_auth(&self, uri: &str, token: &str, cookie_key: &Key) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header("cookie", encrypted_auth_cookie(token, cookie_key))
            .body(Body::empty())
            .expect("Failed to build authenticated request");

        self.request(request).await
    }

    /// Send a POST request with authentication cookie (no body)
    pub async fn post_with_auth(&self, uri: &str, token: &str, cookie_key: &Key) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("cookie", encrypted_auth_cookie(token, cookie_key))
            .body(Body::empty())
            .expect("Failed to build authenticated request");

        self.request(request).await
    }

    /// Send a POST request with JSON body and authentication cookie
    pub async fn post_json_with_auth<T: serde::Serialize>(
        &self,
        uri: &str,
        body: &T,
        token: &str,
        cookie_key: &Key,
    ) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("cookie", encrypted_auth_cookie(token, cookie_key))
            .body(Body::from(json_body))
            .expect("Failed to build authenticated request");

        self.request(request).await
    }

    /// Send a PUT request with JSON body and authentication cookie
    pub async fn put_json_with_auth<T: serde::Serialize>(
        &self,
        uri: &str,
        body: &T,
        token: &str,
        cookie_key: &Key,
    ) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .header("cookie", encrypted_auth_cookie(token, cookie_key))
            .body(Body::from(json_body))
            .expect("Failed to build authenticated request");

        self.request(request).await
    }
}

/// Encrypt a JWT into the `auth_token` cookie the way the server's private
/// cookie jar expects it
fn encrypted_auth_cookie(token: &str, cookie_key: &Key) -> String {
    use cookie::{CookieJar as RawCookieJar, Key as RawKey};

    let raw_key = RawKey::try_from(cookie_key.master()).expect("Invalid key");
    let mut raw_jar = RawCookieJar::new();
    let raw_cookie = cookie::Cookie::new("auth_token", token.to_string());
    raw_jar.private_mut(&raw_key).add(raw_cookie);

    let encrypted = raw_jar.get("auth_token").expect("Cookie should exist");
    format!("{}={}", encrypted.name(), encrypted.value())
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: axum::http::HeaderMap,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }

    /// Extract cookie value by name
    pub fn get_cookie(&self, name: &str) -> Option<String> {
        for value in self.headers.get_all("set-cookie").iter() {
            if let Ok(cookie_str) = value.to_str() {
                if cookie_str.starts_with(&format!("{}=", name)) {
                    let value = cookie_str.split(';').next()?.split('=').nth(1)?.to_string();
                    return Some(value);
                }
            }
        }
        None
    }
}

/// JWT test helpers
pub mod jwt {
    use ct_api::auth::jwt::generate_jwt_token;

    /// Generate a test JWT token for a normalized username
    pub fn create_test_token(username: &str, jwt_secret: &str) -> String {
        generate_jwt_token(username, jwt_secret).expect("Failed to generate test JWT token")
    }
}

/// Store seeding helpers
pub mod seed {
    use ct_api::state::ApiState;
    use ct_store::{Collection, DocStore};
    use serde_json::json;

    /// Insert a registered user directly into the store
    pub async fn user(state: &ApiState, username: &str) {
        let password_hash =
            bcrypt::hash("password123", 4).expect("Failed to hash test password");
        state
            .store
            .insert_one(
                Collection::Users,
                json!({
                    "username": username,
                    "password_hash": password_hash,
                    "progress": {},
                }),
            )
            .await
            .expect("Failed to seed user");
    }

    /// Insert a canonical-shape problem directly into the store
    pub async fn problem(state: &ApiState, id: &str, name: &str, difficulty: &str) {
        state
            .store
            .insert_one(
                Collection::Problems,
                json!({
                    "id": id,
                    "name": name,
                    "link": format!("https://leetcode.com/problems/{id}"),
                    "difficulty": difficulty,
                    "acceptance": 50.0,
                    "topics": ["Array"],
                    "company_tag": ["Google"],
                }),
            )
            .await
            .expect("Failed to seed problem");
    }
}
