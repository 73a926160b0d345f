/// Authentication Routes
///
/// Login, session token refresh and refresh token revocation.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::bearer_token;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, ErrorContext};
use crate::routes::users::UserResponse;
use crate::session;
use crate::store::Database;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Requested session token lifetime; capped at 24 hours
    pub expires_in_seconds: Option<i64>,
}

/// Login response: the public user plus both tokens
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

/// Token refresh response
#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// POST /api/login
///
/// # Errors
/// - 401: invalid credentials (unknown email and wrong password are not distinguished)
/// - 500: internal server error
pub async fn login(
    form: web::Json<LoginRequest>,
    db: web::Data<Database>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let outcome = session::login(
        db.get_ref(),
        jwt_config.get_ref(),
        form.email.trim(),
        &form.password,
        form.expires_in_seconds,
    )
    .await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: UserResponse::from(outcome.user),
        token: outcome.token,
        refresh_token: outcome.refresh_token,
    }))
}

/// POST /api/refresh
///
/// Exchanges the refresh token from `Authorization: Bearer <refresh_token>`
/// for a new session token. The refresh token stays valid.
///
/// # Errors
/// - 401: missing, unknown, revoked or expired refresh token
pub async fn refresh(
    req: HttpRequest,
    db: web::Data<Database>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");
    let refresh_token = refresh_token_from(&req)?;

    let token = session::refresh(db.get_ref(), jwt_config.get_ref(), &refresh_token)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    Ok(HttpResponse::Ok().json(RefreshResponse { token }))
}

/// POST /api/revoke
///
/// # Errors
/// - 401: missing or unknown refresh token
pub async fn revoke(req: HttpRequest, db: web::Data<Database>) -> Result<HttpResponse, AppError> {
    let refresh_token = refresh_token_from(&req)?;

    session::revoke(db.get_ref(), &refresh_token).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// A refresh endpoint without a usable bearer credential is an invalid refresh token.
fn refresh_token_from(req: &HttpRequest) -> Result<String, AppError> {
    bearer_token(req.headers()).map_err(|e| {
        tracing::warn!("Refresh token missing from request: {}", e);
        AppError::Auth(AuthError::InvalidRefreshToken)
    })
}
