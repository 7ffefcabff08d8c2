use ct_store::{Collection, DocStore, Filter};
use serde_json::json;

use super::validation::{normalize_username, validate_password, validate_username};
use crate::error::ApiError;

/// Create a new user with a bcrypt-hashed password.
///
/// The username is normalized before the uniqueness check, so two signups
/// differing only in case or surrounding whitespace conflict.
pub async fn register(
    store: &dyn DocStore,
    bcrypt_cost: u32,
    username: &str,
    password: &str,
) -> Result<(), ApiError> {
    let username = normalize_username(username);
    validate_username(&username)?;
    validate_password(password)?;

    let existing = store
        .find_one(Collection::Users, &Filter::new().eq("username", username.as_str()))
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    let password_hash = bcrypt::hash(password, bcrypt_cost)?;
    store
        .insert_one(
            Collection::Users,
            json!({
                "username": username,
                "password_hash": password_hash,
                "progress": {},
            }),
        )
        .await?;

    Ok(())
}

/// Check credentials and return the normalized username on success.
///
/// An unknown username and a wrong password produce the same error; hash
/// comparison is delegated to `bcrypt::verify`.
pub async fn authenticate(
    store: &dyn DocStore,
    username: &str,
    password: &str,
) -> Result<String, ApiError> {
    let username = normalize_username(username);

    let user = store
        .find_one(Collection::Users, &Filter::new().eq("username", username.as_str()))
        .await?
        .ok_or_else(|| ApiError::Auth("Invalid credentials".to_string()))?;

    let password_hash = user
        .get("password_hash")
        .and_then(|hash| hash.as_str())
        .ok_or_else(|| ApiError::Auth("Invalid credentials".to_string()))?;

    if !bcrypt::verify(password, password_hash)? {
        return Err(ApiError::Auth("Invalid credentials".to_string()));
    }

    Ok(username)
}
