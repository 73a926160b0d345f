/// Authorization header parsing
///
/// Credentials arrive as `Authorization: <Scheme> <token>`. Session and
/// refresh tokens use `Bearer`, the payment webhook uses `ApiKey`.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::AuthError;

pub const BEARER_SCHEME: &str = "Bearer";
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Extract the credential for `scheme` from the request headers
///
/// # Errors
/// - `MissingHeader` when there is no `Authorization` header
/// - `MalformedHeader` when the scheme differs or the credential is absent
pub fn extract_authorization(headers: &HeaderMap, scheme: &str) -> Result<String, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
    parse_authorization(value, scheme)
}

/// Parse a raw `Authorization` header value
pub fn parse_authorization(value: &str, scheme: &str) -> Result<String, AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::MissingHeader);
    }

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(found), Some(credential)) if found == scheme => Ok(credential.to_string()),
        _ => Err(AuthError::MalformedHeader),
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_authorization(headers, BEARER_SCHEME)
}

pub fn api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_authorization(headers, API_KEY_SCHEME)
}
