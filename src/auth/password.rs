use crate::error::AppError;
use bcrypt::{hash, verify};

/// Hashes a board password with a per-hash random salt.
///
/// The password policy is enforced by the caller before this is reached.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Compares a plaintext password against a stored hash.
///
/// A malformed stored hash is a server fault, not a mismatch.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}
