//! Input validation utilities

use crate::error::LoginError;
use crate::models::LoginPayload;

const MIN_USERNAME_LENGTH: usize = 3;
const MIN_PASSWORD_LENGTH: usize = 6;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), LoginError> {
    if username.trim().is_empty() {
        return Err(LoginError::MissingUsername);
    }

    if username.trim().chars().count() < MIN_USERNAME_LENGTH {
        return Err(LoginError::UsernameTooShort);
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), LoginError> {
    if password.trim().is_empty() {
        return Err(LoginError::MissingPassword);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(LoginError::PasswordTooShort);
    }

    Ok(())
}

/// Validate a submitted login form. Presence of both fields is checked
/// before their lengths.
pub fn validate_login(
    username: Option<&str>,
    password: Option<&str>,
) -> Result<LoginPayload, LoginError> {
    let username = username
        .filter(|u| !u.trim().is_empty())
        .ok_or(LoginError::MissingUsername)?;
    let password = password
        .filter(|p| !p.trim().is_empty())
        .ok_or(LoginError::MissingPassword)?;

    validate_username(username)?;
    validate_password(password)?;

    Ok(LoginPayload {
        username: username.trim().to_string(),
        password: password.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_blank_username() {
        assert_eq!(
            validate_login(None, Some("password123")).unwrap_err(),
            LoginError::MissingUsername
        );
        assert_eq!(
            validate_login(Some("   "), Some("password123")).unwrap_err(),
            LoginError::MissingUsername
        );
    }

    #[test]
    fn test_missing_or_blank_password() {
        assert_eq!(
            validate_login(Some("testuser"), None).unwrap_err(),
            LoginError::MissingPassword
        );
        assert_eq!(
            validate_login(Some("testuser"), Some("   ")).unwrap_err(),
            LoginError::MissingPassword
        );
    }

    #[test]
    fn test_presence_is_checked_before_length() {
        assert_eq!(
            validate_login(Some("ab"), None).unwrap_err(),
            LoginError::MissingPassword
        );
    }

    #[test]
    fn test_short_username() {
        let err = validate_login(Some("ab"), Some("password123")).unwrap_err();
        assert_eq!(err, LoginError::UsernameTooShort);
        assert_eq!(err.to_string(), "Username must be at least 3 characters.");

        // Padding does not count towards the length
        assert_eq!(
            validate_username(" ab ").unwrap_err(),
            LoginError::UsernameTooShort
        );
    }

    #[test]
    fn test_short_password() {
        let err = validate_login(Some("testuser"), Some("12345")).unwrap_err();
        assert_eq!(err, LoginError::PasswordTooShort);
        assert_eq!(err.to_string(), "Password must be at least 6 characters.");
    }

    #[test]
    fn test_valid_login_trims_username_only() {
        let payload = validate_login(Some("  validuser "), Some(" secret1")).unwrap();
        assert_eq!(payload.username, "validuser");
        assert_eq!(payload.password, " secret1");
    }
}
