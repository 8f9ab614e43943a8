//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a username was supplied. Any non-empty string, whitespace included, is
/// a valid counter name.
///
/// # Examples
///
/// ```ignore
/// validate_username("alice") // Ok
/// validate_username("   ")   // Ok
/// validate_username("")      // Err - missing
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        let mut err = ValidationError::new("username_required");
        err.message = Some("Username is required".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("player 2").is_ok());
        assert!(validate_username("😼").is_ok());
        assert!(validate_username("   ").is_ok());
    }

    #[test]
    fn test_validate_username_missing() {
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_validate_username_message() {
        let err = validate_username("").unwrap_err();
        assert_eq!(err.code, "username_required");
        assert_eq!(err.message.as_deref(), Some("Username is required"));
    }
}
