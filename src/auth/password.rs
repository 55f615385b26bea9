/// Password Hashing and Verification
///
/// bcrypt with a deliberately low cost factor. Existing documents were
/// written with cost 4, and hashes must stay interchangeable with them.

use bcrypt::{hash, verify};

use crate::error::{AppError, ValidationError};

pub const HASH_COST: u32 = 4;

// bcrypt only looks at the first 72 bytes
const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password using bcrypt
///
/// # Errors
/// Returns error if:
/// - Password is empty or longer than 72 bytes
/// - Bcrypt hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()).into());
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::TooLong("password".to_string(), MAX_PASSWORD_BYTES).into());
    }

    hash(password, HASH_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash
///
/// A malformed stored hash is logged and treated as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match verify(password, hash) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::error!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}
