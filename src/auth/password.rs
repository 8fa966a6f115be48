use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::thread_rng;

use crate::error::AppError;

/// Produces an argon2 PHC string. Strength rules live with the forms.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::internal(format!("Password hashing failed: {err}")))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| AppError::internal(format!("Invalid password hash: {err}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// The PHC salt of `hash`. A fresh salt is drawn on every hash, so the value
/// changes whenever the password does. Empty for malformed hashes.
pub fn fingerprint(hash: &str) -> String {
    PasswordHash::new(hash)
        .ok()
        .and_then(|parsed| parsed.salt.map(|salt| salt.as_str().to_string()))
        .unwrap_or_default()
}
