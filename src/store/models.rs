use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub type UserId = i64;
pub type ChirpId = i64;

/// Refresh token state embedded in a user record.
///
/// `refresh_token` holds the SHA-256 digest of the issued token. The zero value
/// (empty digest, `exp` 0) means no session is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    #[serde(rename = "refresh_token")]
    pub token_hash: String,
    /// Absolute expiry, UTC epoch seconds
    pub exp: i64,
}

impl RefreshTokenRecord {
    pub fn is_active(&self) -> bool {
        !self.token_hash.is_empty()
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp < now
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default)]
    pub is_chirpy_red: bool,
    #[serde(default)]
    pub refresh_token: RefreshTokenRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: ChirpId,
    pub body: String,
    pub author_id: UserId,
}

/// Listing order for chirps, by id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(ValidationError::InvalidFormat("sort".to_string())),
        }
    }
}
