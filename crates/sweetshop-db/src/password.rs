//! Password hashing for stored accounts.
//!
//! Argon2id with a random per-password salt; the stored value is the PHC
//! string (`$argon2id$v=19$...`), so parameters travel with the hash.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::{DbError, DbResult};

/// Hashes a plaintext password for storage.
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Checks a plaintext password against a stored PHC string.
///
/// An unparseable hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// [`hash_password`] on tokio's blocking pool, keeping request workers free
/// while Argon2 runs.
pub async fn hash_password_off_thread(password: String) -> DbResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| DbError::Internal(format!("Password hashing task failed: {}", e)))?
}

/// [`verify_password`] on tokio's blocking pool.
pub async fn verify_password_off_thread(password: String, hash: String) -> DbResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| DbError::Internal(format!("Password check task failed: {}", e)))
}
