//! Password hashing (Argon2id) and registration input checks.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{ApiError, FieldErrors};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a password into PHC string format.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| format!("Failed to hash password: {e}"))
}

/// Returns false for a wrong password and for an unparseable hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err("Password cannot be entirely numeric".to_string());
    }
    Ok(())
}

/// Basic shape check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();

    let Some((local, domain)) = email.split_once('@') else {
        return Err("Enter a valid email address".to_string());
    };
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err("Enter a valid email address".to_string());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Email domain must contain a dot".to_string());
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), String> {
    let username = username.trim();
    if username.is_empty() {
        return Err("Username is required".to_string());
    }
    if username.len() > 150 {
        return Err("Username must be at most 150 characters".to_string());
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '@' | '+'))
    {
        return Err("Username may only contain letters, digits and @/./+/-/_".to_string());
    }
    Ok(())
}

/// All registration checks at once, so the client sees every bad field.
pub fn validate_registration(
    email: &str,
    username: &str,
    password: &str,
    password_confirm: &str,
) -> Result<(), ApiError> {
    let mut fields = FieldErrors::new();

    if let Err(e) = validate_email(email) {
        fields.entry("email".into()).or_default().push(e);
    }
    if let Err(e) = validate_username(username) {
        fields.entry("username".into()).or_default().push(e);
    }
    if password != password_confirm {
        fields
            .entry("password".into())
            .or_default()
            .push("Passwords do not match".to_string());
    }
    if let Err(e) = validate_password_strength(password) {
        fields.entry("password".into()).or_default().push(e);
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("wedding-shots-42").expect("hash should succeed");
        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, "wedding-shots-42");
        assert!(verify_password("wedding-shots-42", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn password_rules() {
        assert!(validate_password_strength("short").is_err());
        assert!(validate_password_strength("1234567890").is_err());
        assert!(validate_password_strength("longenough1").is_ok());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("alice.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@localhost").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }

    #[test]
    fn registration_collects_every_field_error() {
        let err = validate_registration("bad", "", "123", "456").unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                assert!(fields.contains_key("email"));
                assert!(fields.contains_key("username"));
                assert_eq!(fields["password"].len(), 2);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
