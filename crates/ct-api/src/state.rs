use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use ct_store::DocStore;

use crate::{ApiConfig, config::Environment};

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn DocStore>,
    pub auth: AuthConfig,
    pub cookie_key: Key,
    pub environment: Environment,
    pub http: reqwest::Client,
}

/// The slice of state the [`crate::auth::AuthUser`] extractor needs.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
}

impl ApiState {
    pub fn new(config: &ApiConfig, store: Arc<dyn DocStore>) -> Self {
        Self {
            store,
            auth: AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
                bcrypt_cost: config.bcrypt_cost,
            },
            cookie_key: Key::from(config.cookie_secret.as_bytes()),
            environment: config.env.clone(),
            http: reqwest::Client::new(),
        }
    }
}

impl FromRef<ApiState> for Key {
    fn from_ref(state: &ApiState) -> Self {
        state.cookie_key.clone()
    }
}

impl FromRef<ApiState> for AuthConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.auth.clone()
    }
}
