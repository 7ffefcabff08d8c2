use crate::error::ApiError;

/// Normalize a username for storage and lookup: trimmed and lowercased.
///
/// Both registration and login pass through here, so `" Foo "` at signup and
/// `"foo"` at login resolve to the same account.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Validate an already-normalized username
pub fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::Validation("Username cannot be empty".to_string()));
    }

    if username.chars().any(char::is_whitespace) {
        return Err(ApiError::Validation(
            "Username cannot contain spaces".to_string(),
        ));
    }

    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::Validation("Password cannot be empty".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username(" Foo "), "foo");
        assert_eq!(normalize_username("ALICE"), "alice");
        assert_eq!(normalize_username("bob"), "bob");
    }

    #[test]
    fn test_validate_username_rejects_empty() {
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_validate_username_rejects_spaces() {
        assert!(validate_username("foo bar").is_err());
        assert!(validate_username("foo\tbar").is_err());
    }

    #[test]
    fn test_validate_username_accepts_normal_names() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("alice_42").is_ok());
    }

    #[test]
    fn test_validate_password_rejects_empty() {
        assert!(validate_password("").is_err());
        assert!(validate_password("hunter2").is_ok());
    }
}
