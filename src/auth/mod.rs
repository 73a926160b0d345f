/// Authentication module
///
/// Handles session token (JWT) generation/validation, password hashing,
/// refresh token generation and Authorization header parsing.

mod claims;
mod header;
mod jwt;
mod password;
mod refresh_token;

pub use claims::Claims;
pub use header::{api_key, bearer_token, extract_authorization, parse_authorization};
pub use header::{API_KEY_SCHEME, BEARER_SCHEME};
pub use jwt::{effective_ttl, MAX_SESSION_TTL_SECONDS};
pub use jwt::{issue_session_token, issue_session_token_at};
pub use jwt::{validate_session_token, validate_session_token_at};
pub use password::hash_password;
pub use password::verify_password;
pub use refresh_token::{generate_refresh_token, hash_token, IssuedRefreshToken};
pub use refresh_token::REFRESH_TOKEN_TTL_DAYS;
