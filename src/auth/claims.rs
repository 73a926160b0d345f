/// JWT Claims structure
///
/// Registered claims only (RFC 7519): the subject is the stringified user id.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AuthError};
use crate::store::UserId;

/// JWT Claims for session tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id as decimal string)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Claims issued at `now` and valid for `ttl_seconds`
    pub fn new(user_id: UserId, issued_at: i64, ttl_seconds: i64, issuer: String) -> Self {
        Self {
            sub: user_id.to_string(),
            exp: issued_at + ttl_seconds,
            iat: issued_at,
            iss: issuer,
        }
    }

    /// Extract the user id from the subject
    ///
    /// # Errors
    /// A subject that is not an integer makes the whole token invalid.
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.sub
            .parse::<UserId>()
            .map_err(|_| AppError::Auth(AuthError::TokenInvalid))
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp < now
    }
}
