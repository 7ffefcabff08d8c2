use std::env;

/// Deployment environment, selected with the `ENVIRONMENT` variable.
///
/// Controls log formatting and cookie security flags. Anything other than
/// `production`/`prod` (case-insensitive) is treated as development.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        match env::var("ENVIRONMENT") {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::Development,
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Absent means "run on the in-memory store" (development only).
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub cookie_secret: String,
    pub bcrypt_cost: u32,
    pub env: Environment,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").ok(),
            jwt_secret: env::var("JWT_SECRET")?,
            cookie_secret: env::var("COOKIE_SECRET")?,
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|cost| cost.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
            env: Environment::from_env(),
        })
    }
}
