/// Chirp Routes

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::Claims;
use crate::error::{AppError, ValidationError};
use crate::store::{ChirpId, Database, SortOrder, UserId};
use crate::validators::validate_chirp_body;

#[derive(Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

/// Query string of GET /api/chirps, parsed by hand for structured 400s
#[derive(Deserialize)]
pub struct ChirpsQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

impl ChirpsQuery {
    fn author_id(&self) -> Result<Option<UserId>, ValidationError> {
        match self.author_id.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<UserId>()
                .map(Some)
                .map_err(|_| ValidationError::InvalidFormat("author_id".to_string())),
        }
    }

    fn sort(&self) -> Result<SortOrder, ValidationError> {
        match self.sort.as_deref() {
            None | Some("") => Ok(SortOrder::default()),
            Some(raw) => raw.parse(),
        }
    }
}

fn parse_chirp_id(raw: &str) -> Result<ChirpId, ValidationError> {
    raw.parse::<ChirpId>()
        .map_err(|_| ValidationError::InvalidFormat("chirp_id".to_string()))
}

/// POST /api/chirps
///
/// **Requires a session token.** The body is length-checked and masked
/// before it is stored.
pub async fn create_chirp(
    claims: web::ReqData<Claims>,
    form: web::Json<CreateChirpRequest>,
    db: web::Data<Database>,
) -> Result<HttpResponse, AppError> {
    let author_id = claims.user_id()?;
    let body = validate_chirp_body(&form.body)?;

    let chirp = db.create_chirp(&body, author_id).await?;

    Ok(HttpResponse::Created().json(chirp))
}

/// GET /api/chirps?author_id=<id>&sort=asc|desc
pub async fn list_chirps(
    query: web::Query<ChirpsQuery>,
    db: web::Data<Database>,
) -> Result<HttpResponse, AppError> {
    let author_id = query.author_id()?;
    let order = query.sort()?;

    let chirps = db.get_chirps(author_id, order).await?;

    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    path: web::Path<String>,
    db: web::Data<Database>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = parse_chirp_id(&path)?;

    let chirp = db.get_chirp(chirp_id).await?;

    Ok(HttpResponse::Ok().json(chirp))
}

/// DELETE /api/chirps/{chirp_id}
///
/// **Requires a session token.** Only the author may delete.
///
/// # Errors
/// - 404: no such chirp
/// - 403: chirp belongs to someone else
pub async fn delete_chirp(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<Database>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = parse_chirp_id(&path)?;
    let requester_id = claims.user_id()?;

    db.delete_chirp(chirp_id, requester_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
