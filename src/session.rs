/// Session lifecycle
///
/// Ties the password hasher, the token service and the record store together.
/// A user's session state is derived from the refresh token stored with them:
///
/// - login: credentials verified → session token issued, refresh token stored
///   (replacing any previous one)
/// - refresh: live refresh token → new session token, same refresh token kept
/// - refresh with an expired token → token cleared, then rejected
/// - revoke: refresh token cleared

use chrono::Utc;

use crate::auth::{generate_refresh_token, issue_session_token, verify_password};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::store::{Database, User};

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

/// Verify credentials and open a session.
///
/// An unknown email and a wrong password both yield `InvalidCredentials`.
pub async fn login(
    db: &Database,
    config: &JwtSettings,
    email: &str,
    password: &str,
    requested_ttl: Option<i64>,
) -> Result<LoginOutcome, AppError> {
    let user = match db.get_user_by_email(email).await {
        Ok(user) => user,
        Err(e) if e.is_not_found() => return Err(AuthError::InvalidCredentials.into()),
        Err(e) => return Err(e),
    };

    verify_password(password, &user.password_hash)?;

    let token = issue_session_token(user.id, config, requested_ttl)?;
    let refresh = generate_refresh_token()?;
    let user = db
        .associate_refresh_token(user.id, &refresh.token, refresh.expires_at)
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(LoginOutcome {
        user,
        token,
        refresh_token: refresh.token,
    })
}

/// Exchange a refresh token for a new session token.
///
/// The refresh token itself is not rotated. An expired token is cleared from
/// the store before the failure is reported.
pub async fn refresh(
    db: &Database,
    config: &JwtSettings,
    refresh_token: &str,
) -> Result<String, AppError> {
    let user = find_session_owner(db, refresh_token).await?;

    if user.refresh_token.is_expired_at(Utc::now().timestamp()) {
        // a concurrent login may already have replaced the token
        match db.revoke_refresh_token(refresh_token).await {
            Ok(_) => {
                tracing::info!(user_id = %user.id, "Expired refresh token presented and cleared")
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        return Err(AuthError::RefreshTokenExpired.into());
    }

    let token = issue_session_token(user.id, config, None)?;
    tracing::info!(user_id = %user.id, "Session token refreshed");
    Ok(token)
}

/// Close the session holding `refresh_token`
pub async fn revoke(db: &Database, refresh_token: &str) -> Result<(), AppError> {
    match db.revoke_refresh_token(refresh_token).await {
        Ok(user_id) => {
            tracing::info!(user_id = %user_id, "Refresh token revoked");
            Ok(())
        }
        Err(e) if e.is_not_found() => Err(AuthError::InvalidRefreshToken.into()),
        Err(e) => Err(e),
    }
}

async fn find_session_owner(db: &Database, refresh_token: &str) -> Result<User, AppError> {
    match db.get_user_by_refresh_token(refresh_token).await {
        Ok(user) => Ok(user),
        Err(e) if e.is_not_found() => Err(AuthError::InvalidRefreshToken.into()),
        Err(e) => Err(e),
    }
}
