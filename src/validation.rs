use crate::error::AppError;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub fn require_valid_id(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must be a valid ID")));
    }
    Ok(())
}

/// Shallow shape check: one `@` with text on both sides. Real deliverability
/// is the verification trigger's job.
pub fn require_email(value: &str) -> Result<(), AppError> {
    let trimmed = value.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => Ok(()),
        _ => Err(AppError::Validation("Please enter a valid email address".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_email() {
        assert!(require_email("jane@x.com").is_ok());
        assert!(require_email("  jane@x.com ").is_ok());
        assert!(require_email("jane").is_err());
        assert!(require_email("@x.com").is_err());
        assert!(require_email("jane@").is_err());
        assert!(require_email("a@b@c").is_err());
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("Name", "Acme").is_ok());
        let err = require_non_empty("Name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Name cannot be empty");
    }
}
