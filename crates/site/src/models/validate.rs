//! Input checks shared by the public submission endpoints.

/// Maximum length of short text fields (names, phone numbers, subjects).
pub const MAX_SHORT_FIELD: usize = 200;

/// Maximum length of free-text fields.
pub const MAX_MESSAGE: usize = 5000;

/// Require a non-blank field no longer than `max` characters.
pub fn required(field: &str, value: &str, max: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    if trimmed.chars().count() > max {
        return Err(format!("{field} must be at most {max} characters"));
    }
    Ok(())
}

/// Allow a blank field, but cap its length.
pub fn optional(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.trim().chars().count() > max {
        return Err(format!("{field} must be at most {max} characters"));
    }
    Ok(())
}

/// A cheap shape check: one `@`, something on both sides, a dot in the domain.
pub fn email(value: &str) -> Result<(), String> {
    required("email", value, MAX_SHORT_FIELD)?;
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err("email is not a valid address".to_string())
    }
}
