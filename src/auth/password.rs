/// Password Hashing and Verification
///
/// Salted bcrypt hashes with a fixed work factor. The output is
/// self-describing (`$2b$<cost>$<salt><hash>`), so verification needs only
/// the stored string.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, AuthError, ValidationError};

/// bcrypt only looks at the first 72 bytes of its input
const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password using bcrypt
///
/// # Errors
/// Returns a validation error for empty passwords or passwords longer than
/// 72 bytes, and an internal error if bcrypt itself fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()).into());
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(
            ValidationError::TooLong("password".to_string(), MAX_PASSWORD_BYTES).into(),
        );
    }

    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash
///
/// A wrong password and an unreadable hash are indistinguishable to the
/// caller: both yield `InvalidCredentials`.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AppError> {
    match verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::InvalidCredentials.into()),
        Err(e) => {
            tracing::warn!("Stored password hash could not be checked: {}", e);
            Err(AuthError::InvalidCredentials.into())
        }
    }
}
