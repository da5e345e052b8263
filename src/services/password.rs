use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand_core::OsRng;

use crate::error::ApiError;

pub fn hash_password(raw: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
}

/// Checks `raw` against a stored PHC string. A stored value that does not
/// parse never verifies.
pub fn verify_password(raw: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default().verify_password(raw.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            log::error!("Password hash parsing failed: {}", e);
            false
        }
    }
}

/// Treats absent and whitespace-only passwords alike.
pub fn provided(password: Option<&str>) -> Option<&str> {
    password.filter(|p| !p.trim().is_empty())
}
