/// JWT Session Token Generation and Validation
///
/// Session tokens are HS256-signed JWTs carrying the user id as subject.
/// Lifetimes are capped at 24 hours whatever the caller asks for.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::store::UserId;

/// Upper bound for a session token lifetime
pub const MAX_SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Resolve the lifetime to sign with.
///
/// Absent or non-positive requests use the configured default; anything above
/// the bound is silently capped.
pub fn effective_ttl(requested_ttl: Option<i64>, config: &JwtSettings) -> i64 {
    let ttl = match requested_ttl {
        Some(ttl) if ttl > 0 => ttl,
        _ => config.access_token_expiry,
    };
    ttl.min(MAX_SESSION_TTL_SECONDS)
}

/// Generate a new session token for a user
///
/// # Errors
/// Returns error if token signing fails
pub fn issue_session_token(
    user_id: UserId,
    config: &JwtSettings,
    requested_ttl: Option<i64>,
) -> Result<String, AppError> {
    issue_session_token_at(user_id, config, requested_ttl, chrono::Utc::now().timestamp())
}

/// Same as [`issue_session_token`] with an explicit issue time
pub fn issue_session_token_at(
    user_id: UserId,
    config: &JwtSettings,
    requested_ttl: Option<i64>,
    issued_at: i64,
) -> Result<String, AppError> {
    let claims = Claims::new(
        user_id,
        issued_at,
        effective_ttl(requested_ttl, config),
        config.issuer.clone(),
    );

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Validate a session token and extract its claims
///
/// # Errors
/// - `TokenExpired` once `exp` has passed
/// - `InvalidIssuer` when signed for another issuer
/// - `TokenInvalid` for anything malformed, tampered with, or signed with another key
pub fn validate_session_token(token: &str, config: &JwtSettings) -> Result<Claims, AppError> {
    validate_session_token_at(token, config, chrono::Utc::now().timestamp())
}

/// Same as [`validate_session_token`] against an explicit clock
pub fn validate_session_token_at(
    token: &str,
    config: &JwtSettings,
    now: i64,
) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // expiry is checked below against `now`, without leeway
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("JWT validation error: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
            _ => AuthError::TokenInvalid,
        }
    })?;

    if claims.is_expired_at(now) {
        return Err(AuthError::TokenExpired.into());
    }

    if claims.iss != config.issuer {
        tracing::warn!(issuer = %claims.iss, "JWT signed for another issuer");
        return Err(AuthError::InvalidIssuer.into());
    }

    Ok(claims)
}
