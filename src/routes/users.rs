/// User Routes
///
/// Account creation, profile update and lookup. Password hashes never leave
/// the record store through these responses.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, Claims};
use crate::error::{AppError, ErrorContext, ValidationError};
use crate::store::{Database, User, UserId};
use crate::validators::is_valid_email;

/// Body of POST and PUT /api/users
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user
#[derive(Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

/// POST /api/users
///
/// # Errors
/// - 400: invalid email or empty/oversized password
/// - 409: email already registered
pub async fn create_user(
    form: web::Json<CredentialsRequest>,
    db: web::Data<Database>,
) -> Result<HttpResponse, AppError> {
    let email = is_valid_email(&form.email)?;
    let password_hash = hash_password(&form.password)?;

    let user = db.create_user(&email, &password_hash).await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// PUT /api/users
///
/// Replaces the caller's email and password. **Requires a session token.**
///
/// # Errors
/// - 401: missing or invalid session token (handled by middleware)
/// - 404: the token's user no longer exists
/// - 409: the new email belongs to another user
pub async fn update_user(
    claims: web::ReqData<Claims>,
    form: web::Json<CredentialsRequest>,
    db: web::Data<Database>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let context = ErrorContext::new("user_update").with_user_id(user_id);

    let email = is_valid_email(&form.email)?;
    let password_hash = hash_password(&form.password)?;

    let user = db
        .update_user(user_id, &email, &password_hash)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    tracing::info!(request_id = %context.request_id, user_id = %user_id, "User updated");

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// GET /api/users
pub async fn list_users(db: web::Data<Database>) -> Result<HttpResponse, AppError> {
    let users: Vec<UserResponse> = db
        .get_users()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/{user_id}
pub async fn get_user(
    path: web::Path<String>,
    db: web::Data<Database>,
) -> Result<HttpResponse, AppError> {
    let user_id = path
        .parse::<UserId>()
        .map_err(|_| ValidationError::InvalidFormat("user_id".to_string()))?;

    let user = db.get_user(user_id).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
