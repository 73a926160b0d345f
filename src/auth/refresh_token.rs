/// Refresh Token Generation
///
/// Refresh tokens are:
/// - 32 bytes from the operating system's CSPRNG, hex-encoded (64 chars)
/// - Valid for 60 days from issue
/// - Not bound to a subject: the binding lives in the record store
/// - Hashed with SHA-256 before storage (the store never sees plaintext)

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::AppError;

const REFRESH_TOKEN_BYTES: usize = 32;
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// A freshly generated refresh token, in plaintext, as handed to the client
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate a new cryptographically secure refresh token
///
/// # Errors
/// Returns error if the system random source is unavailable
pub fn generate_refresh_token() -> Result<IssuedRefreshToken, AppError> {
    let mut random = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut random)
        .map_err(|e| AppError::Internal(format!("Random source failed: {}", e)))?;

    Ok(IssuedRefreshToken {
        token: hex::encode(random),
        expires_at: Utc::now() + Duration::days(REFRESH_TOKEN_TTL_DAYS),
    })
}

/// Hash a refresh token using SHA-256
///
/// Only the digest is persisted; lookups hash the presented token first.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
