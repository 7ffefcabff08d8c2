use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use serde::Deserialize;

use super::{jwt, middleware::AuthUser, service};
use crate::{ApiState, error::ApiError};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(auth_me))
        .route("/auth/logout", get(logout))
}

#[derive(Debug, Deserialize)]
struct CredentialsRequest {
    username: String,
    password: String,
}

async fn register(
    State(state): State<ApiState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    service::register(
        state.store.as_ref(),
        state.auth.bcrypt_cost,
        &body.username,
        &body.password,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Account created successfully" })),
    ))
}

async fn login(
    State(state): State<ApiState>,
    jar: PrivateCookieJar,
    Json(body): Json<CredentialsRequest>,
) -> Result<(PrivateCookieJar, Json<serde_json::Value>), ApiError> {
    let username = service::authenticate(state.store.as_ref(), &body.username, &body.password).await?;

    let token = jwt::generate_jwt_token(&username, &state.auth.jwt_secret)?;
    let cookie = jwt::create_auth_cookie(token, &state.environment);
    let jar = jar.add(cookie);

    Ok((
        jar,
        Json(serde_json::json!({
            "message": "Logged in successfully",
            "username": username,
        })),
    ))
}

async fn auth_me(auth_user: AuthUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "username": auth_user.username }))
}

async fn logout(jar: PrivateCookieJar) -> (PrivateCookieJar, Json<serde_json::Value>) {
    let cookie = Cookie::build(("auth_token", "")).path("/").build();
    let jar = jar.remove(cookie);

    (
        jar,
        Json(serde_json::json!({ "message": "Logged out successfully" })),
    )
}
