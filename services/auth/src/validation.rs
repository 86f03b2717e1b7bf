//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::NewUser;

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    let length = name.chars().count();

    if length == 0 {
        return Err("Name is required".to_string());
    }

    if length < 2 {
        return Err("Name must be at least 2 characters long".to_string());
    }

    if length > 50 {
        return Err("Name must be at most 50 characters long".to_string());
    }

    if name.chars().any(char::is_control) {
        return Err("Name cannot contain control characters".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());

    if !has_upper {
        return Err("Password must contain at least one uppercase letter".to_string());
    }

    if !has_lower {
        return Err("Password must contain at least one lowercase letter".to_string());
    }

    if !has_digit {
        return Err("Password must contain at least one digit".to_string());
    }

    if !has_special {
        return Err("Password must contain at least one special character".to_string());
    }

    Ok(())
}

/// Validate a full registration, reporting the first problem found
pub fn validate_registration(new_user: &NewUser) -> Result<(), String> {
    validate_name(&new_user.name)?;
    validate_email(&new_user.email)?;
    validate_password(&new_user.password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_bounds() {
        assert!(validate_name("Jo").is_ok());
        assert!(validate_name("Zoë Ångström").is_ok());
        assert!(validate_name("J").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(51)).is_err());
        assert!(validate_name("tab\tname").is_err());
    }

    #[test]
    fn test_email_format() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("ana.lima+photos@mail.example.org").is_ok());
        assert!(validate_email("ana@").is_err());
        assert!(validate_email("not an email").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Str0ng!pass").is_ok());
        assert_eq!(
            validate_password("Sh0rt!"),
            Err("Password must be at least 8 characters long".to_string())
        );
        assert!(validate_password("alllower1!").is_err());
        assert!(validate_password("ALLUPPER1!").is_err());
        assert!(validate_password("NoDigits!!").is_err());
        assert_eq!(
            validate_password("NoSpecial1"),
            Err("Password must contain at least one special character".to_string())
        );
    }

    #[test]
    fn test_registration_reports_first_problem() {
        let new_user = NewUser {
            name: "A".to_string(),
            email: "bad".to_string(),
            password: "weak".to_string(),
        };
        assert_eq!(
            validate_registration(&new_user),
            Err("Name must be at least 2 characters long".to_string())
        );
    }
}
