// Validation utilities for string fields

/// Trim and validate string fields
///
/// Returns the trimmed string, or an error message when a required field is
/// empty after trimming.
pub fn trim_and_validate_field(field: &str, required: bool) -> Result<String, String> {
    let trimmed = field.trim().to_string();
    if trimmed.is_empty() {
        if required {
            Err("Field cannot be empty".to_string())
        } else {
            Ok(trimmed)
        }
    } else {
        Ok(trimmed)
    }
}

/// Normalize an email address for storage and lookup: trimmed and lowercased.
/// Email uniqueness is case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_and_validate_field() {
        assert_eq!(
            trim_and_validate_field("  hello  ", true),
            Ok("hello".to_string())
        );
        assert!(trim_and_validate_field("   ", true).is_err());
        assert_eq!(trim_and_validate_field("   ", false), Ok(String::new()));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
        assert_eq!(normalize_email("a@x.com"), "a@x.com");
    }

    #[test]
    fn test_normalize_email_keeps_pattern_characters_literal() {
        // `_` and `%` are legal in the local part; normalization must not
        // touch them, and the store matches them as literal characters.
        assert_eq!(normalize_email("jon_doe@x.com"), "jon_doe@x.com");
        assert_eq!(normalize_email("50%off@x.com"), "50%off@x.com");
        assert_ne!(normalize_email("jon_doe@x.com"), "jonadoe@x.com");
    }
}
